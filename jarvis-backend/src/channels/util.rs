//! Shared utilities for channel implementations.

/// Telegram's per-message limit, used for generated replies
pub const GENERATED_REPLY_LIMIT: usize = 4096;

/// Chunk size for memory dumps
pub const MEMORY_DUMP_LIMIT: usize = 4000;

/// Split `text` into consecutive chunks of at most `max_len` characters.
///
/// Chunks are contiguous slices: joining them yields the original text exactly.
/// Counting is by `char`, so multi-byte characters are never cut.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 || text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_len {
            chunks.push(text[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(text[start..].to_string());

    chunks
}

/// First `max_chars` characters of `text`, for log lines
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
