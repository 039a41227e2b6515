use core::fmt::{self, Write};

use super::commands::{ConsoleCommand, ConsoleError, SessionCommand};
use crate::{
    metrics::{CompressionStateEngine, Millis, StatusSnapshot, Thresholds},
    session::TrainingSession,
    telemetry::{write_status_line, write_thresholds_line},
};

#[derive(Clone, Debug, PartialEq)]
pub enum ConsoleReply {
    Pong,
    Reset,
    Status(StatusSnapshot),
    Thresholds(Thresholds),
    Configured(Thresholds),
    SessionStarted(u32),
    SessionStopped(u32),
    SessionUnchanged { recording: bool },
    Rejected(ConsoleError),
}

impl ConsoleReply {
    pub fn write_line(&self, out: &mut impl Write) -> fmt::Result {
        match self {
            Self::Pong => out.write_str("OK PONG"),
            Self::Reset => out.write_str("OK RESET"),
            Self::Status(snapshot) => write_status_line(snapshot, out),
            Self::Thresholds(thresholds) => write_thresholds_line(thresholds, out),
            Self::Configured(thresholds) => {
                out.write_str("OK ")?;
                write_thresholds_line(thresholds, out)
            }
            Self::SessionStarted(id) => write!(out, "OK SESSION START id={id}"),
            Self::SessionStopped(id) => write!(out, "OK SESSION STOP id={id}"),
            Self::SessionUnchanged { recording: true } => out.write_str("ERR session_active"),
            Self::SessionUnchanged { recording: false } => out.write_str("ERR session_idle"),
            Self::Rejected(error) => write!(out, "ERR {error}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
    pub reply: ConsoleReply,
    /// Thresholds or the session counter changed and should reach flash.
    pub persist: bool,
}

/// Runs one console command against the sampler-owned state. Must be called
/// between samples.
pub fn apply_command(
    command: ConsoleCommand,
    engine: &mut CompressionStateEngine,
    session: &mut TrainingSession,
    now_ms: Millis,
) -> Applied {
    log::info!("console: apply cmd={} now_ms={}", command.label(), now_ms);
    let (reply, persist) = match command {
        ConsoleCommand::Ping => (ConsoleReply::Pong, false),
        ConsoleCommand::Status => (ConsoleReply::Status(engine.snapshot(now_ms)), false),
        ConsoleCommand::Reset => {
            engine.reset();
            (ConsoleReply::Reset, false)
        }
        ConsoleCommand::Session(SessionCommand::Start) => match session.start(engine) {
            Some(id) => (ConsoleReply::SessionStarted(id), true),
            None => (ConsoleReply::SessionUnchanged { recording: true }, false),
        },
        ConsoleCommand::Session(SessionCommand::Stop) => match session.stop() {
            Some(id) => (ConsoleReply::SessionStopped(id), false),
            None => (ConsoleReply::SessionUnchanged { recording: false }, false),
        },
        ConsoleCommand::ThresholdsGet => (ConsoleReply::Thresholds(engine.thresholds()), false),
        ConsoleCommand::ThresholdsSet(thresholds) => {
            engine.configure(thresholds);
            (ConsoleReply::Configured(thresholds), true)
        }
    };
    Applied { reply, persist }
}
