//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling
//! - `shell` - Display quoting and template splitting
//! - `suggest` - Fuzzy "did you mean" matching

pub mod io;
pub mod shell;
pub mod suggest;
