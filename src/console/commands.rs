use core::fmt;

use crate::metrics::{ThresholdError, Thresholds};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConsoleCommand {
    Ping,
    Status,
    Reset,
    Session(SessionCommand),
    ThresholdsGet,
    ThresholdsSet(Thresholds),
}

impl ConsoleCommand {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Status => "status",
            Self::Reset => "reset",
            Self::Session(SessionCommand::Start) => "session_start",
            Self::Session(SessionCommand::Stop) => "session_stop",
            Self::ThresholdsGet => "thresh",
            Self::ThresholdsSet(_) => "threshset",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleError {
    UnknownCommand,
    MissingArgument,
    UnknownKey,
    BadValue,
    Invalid(ThresholdError),
}

impl ConsoleError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown_command",
            Self::MissingArgument => "missing_argument",
            Self::UnknownKey => "unknown_key",
            Self::BadValue => "bad_value",
            Self::Invalid(_) => "invalid",
        }
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(reason) => write!(f, "invalid reason={reason}"),
            other => f.write_str(other.label()),
        }
    }
}
