//! Memory commands - view and wipe stored memories

use crate::ai::ERROR_PREFIX;
use crate::channels::types::Reply;
use crate::channels::util::{split_message, MEMORY_DUMP_LIMIT};
use crate::memory::MemoryStore;

const MEMORY_TITLE: &str = "🧠 **Stored Memories:**";

/// Show every stored memory, splitting long dumps
pub fn show(memory: &MemoryStore) -> Vec<Reply> {
    if memory.is_empty() {
        return vec![Reply::plain(
            "🧠 Memory is empty. Say 'remember this: [info]' to store something.",
        )];
    }

    let blob = memory.snapshot();
    let message = format!("{}\n\n{}", MEMORY_TITLE, blob);
    if message.chars().count() <= MEMORY_DUMP_LIMIT {
        return vec![Reply::markdown(message)];
    }

    let mut replies = vec![Reply::markdown(format!(
        "{} (split across several messages)",
        MEMORY_TITLE
    ))];
    replies.extend(
        split_message(&blob, MEMORY_DUMP_LIMIT)
            .into_iter()
            .map(Reply::plain),
    );
    replies
}

/// Delete the memory log
pub fn forget(memory: &MemoryStore) -> Reply {
    match memory.clear() {
        Ok(()) => {
            Reply::plain("🧠 Memory wiped clean. I've forgotten everything... how refreshing.")
        }
        Err(_) => Reply::plain(format!(
            "{} Error clearing memory. Some things are harder to forget.",
            ERROR_PREFIX
        )),
    }
}
