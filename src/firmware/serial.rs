use embassy_time::{with_timeout, Duration};

use cpr_trainer::console::{parse_console_command, ConsoleReply, LineReadEvent, SerialLineReader};

use super::{
    config::{CONSOLE_COMMANDS, CONSOLE_REPLIES, LINE_OUT_MAX, REPLY_TIMEOUT_MS, SERIAL_POLL_MS},
    types::SerialUart,
};

#[embassy_executor::task]
pub(crate) async fn serial_task(mut uart: SerialUart) {
    let mut reader = SerialLineReader::new();
    let mut rx = [0u8; 1];

    let _ = uart_write_all(&mut uart, b"CPR READY\r\n").await;

    loop {
        let Ok(Ok(1)) =
            with_timeout(Duration::from_millis(SERIAL_POLL_MS), uart.read_async(&mut rx)).await
        else {
            continue;
        };

        let parsed = match reader.push_byte(rx[0]) {
            LineReadEvent::None => continue,
            LineReadEvent::Overflow => {
                let _ = uart_write_all(&mut uart, b"ERR line_too_long\r\n").await;
                continue;
            }
            LineReadEvent::Complete(line) => parse_console_command(line),
        };

        let reply = match parsed {
            Ok(command) => {
                // A reply that missed its timeout must not answer this command.
                while CONSOLE_REPLIES.try_receive().is_ok() {}
                if CONSOLE_COMMANDS.try_send(command).is_err() {
                    let _ = uart_write_all(&mut uart, b"ERR busy\r\n").await;
                    continue;
                }
                match with_timeout(
                    Duration::from_millis(REPLY_TIMEOUT_MS),
                    CONSOLE_REPLIES.receive(),
                )
                .await
                {
                    Ok(reply) => reply,
                    Err(_) => {
                        log::warn!("serial: reply timeout cmd={}", command.label());
                        let _ = uart_write_all(&mut uart, b"ERR timeout\r\n").await;
                        continue;
                    }
                }
            }
            Err(error) => ConsoleReply::Rejected(error),
        };
        write_reply(&mut uart, &reply).await;
    }
}

async fn write_reply(uart: &mut SerialUart, reply: &ConsoleReply) {
    let mut line = heapless::String::<LINE_OUT_MAX>::new();
    if reply.write_line(&mut line).is_err() || line.push_str("\r\n").is_err() {
        let _ = uart_write_all(uart, b"ERR reply_too_long\r\n").await;
        return;
    }
    let _ = uart_write_all(uart, line.as_bytes()).await;
}

async fn uart_write_all(uart: &mut SerialUart, mut bytes: &[u8]) -> bool {
    while !bytes.is_empty() {
        match uart.write_async(bytes).await {
            Ok(0) => return false,
            Ok(written) => bytes = &bytes[written..],
            Err(_) => return false,
        }
    }
    true
}
