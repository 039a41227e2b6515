use cpr_trainer::{
    console::{ConsoleCommand, ConsoleReply},
    metrics::StatusSnapshot,
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

pub(crate) const UART_BAUD: u32 = 115_200;
pub(crate) const SAMPLE_INTERVAL_MS: u64 = 25;
pub(crate) const SERIAL_POLL_MS: u64 = 10;
pub(crate) const REPLY_TIMEOUT_MS: u64 = 250;
pub(crate) const LINE_OUT_MAX: usize = 448;

pub(crate) static CONSOLE_COMMANDS: Channel<CriticalSectionRawMutex, ConsoleCommand, 4> =
    Channel::new();
pub(crate) static CONSOLE_REPLIES: Channel<CriticalSectionRawMutex, ConsoleReply, 4> =
    Channel::new();
pub(crate) static SNAPSHOTS: Channel<CriticalSectionRawMutex, StatusSnapshot, 4> = Channel::new();
