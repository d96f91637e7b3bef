//! Shared utilities.

mod hash;
mod text;

pub use hash::{content_hash, fnv1a64, hex_u64};
pub use text::{ends_with_ignore_ascii_case, normalize_field, normalize_slashes};
