//! Help command - shows available commands

use crate::channels::types::Reply;

/// Execute the start/help command
pub fn execute() -> Reply {
    Reply::markdown(
        "🤖 **JARVIS Online** - Advanced AI Assistant\n\n\
        Available commands:\n\
        • `/start` - Show this message\n\
        • `/status` - Check system status\n\
        • `/models` - List available AI models\n\
        • `/model <name>` - Switch AI model\n\
        • `/memory` - View stored memories\n\
        • `/forget` - Clear all memories\n\n\
        💡 **Memory Features:**\n\
        • Say 'remember this: [info]' to store information\n\
        • I'll remember context across conversations\n\n\
        Just send me any message and I'll respond with my characteristic wit and intelligence. 🧠",
    )
}
