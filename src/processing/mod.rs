//! Text processing modules

pub mod parser;

pub use parser::{parse, parse_axis, try_parse, try_parse_axis};
