//! UART console: line framing and command parsing.

mod commands;
mod dispatch;
mod line_reader;
mod parser;
mod util;

pub use commands::{ConsoleCommand, ConsoleError, SessionCommand};
pub use dispatch::{apply_command, Applied, ConsoleReply};
pub use line_reader::{LineReadEvent, SerialLineReader, CONSOLE_LINE_MAX};
pub use parser::parse_console_command;
