//! Fixed-capacity chunking of framed text.
//!
//! Capacity is counted in `char`s because that is how cell limits are
//! measured. Empty text produces no chunks at all.

use std::num::NonZeroUsize;

pub fn split(text: &str, capacity: NonZeroUsize) -> Vec<&str> {
    let cap = capacity.get();
    let mut chunks = Vec::with_capacity(text.len() / cap + 1);
    let mut start = 0usize;
    let mut count = 0usize;
    for (idx, _) in text.char_indices() {
        if count == cap {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if count > 0 {
        chunks.push(&text[start..]);
    }
    chunks
}

pub fn join<S: AsRef<str>>(chunks: &[S]) -> String {
    let total = chunks.iter().map(|c| c.as_ref().len()).sum();
    let mut out = String::with_capacity(total);
    for c in chunks {
        out.push_str(c.as_ref());
    }
    out
}
