//! I/O utilities for topic-cards.
//!
//! Reads raw model output from files or stdin, plus Unicode helpers.

pub mod reader;
pub mod unicode;

pub use reader::{read_file, read_input};
pub use unicode::find_char_boundary;
