//! Reusable analyzers invoked by the per-keyword rule bodies: none of
//! these know about `Instruction`/`Diagnostic` — they work on plain
//! strings and return small result enums that callers turn into
//! diagnostics with the right range.

pub mod duration;
pub mod image_reference;
pub mod json_single_quotes;
pub mod property;
