//! Operator commands read from the console.

mod operator_console;
mod parser;

pub use operator_console::ConsoleService;
pub use parser::{parse_line, OperatorCommand, PUBLISH_PREFIX};
