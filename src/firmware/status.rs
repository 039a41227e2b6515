use cpr_trainer::telemetry::{write_phase_line, write_status_line, TelemetryPacer};

use super::config::{LINE_OUT_MAX, SNAPSHOTS};

#[embassy_executor::task]
pub(crate) async fn status_task() {
    let mut pacer = TelemetryPacer::default();

    loop {
        let snapshot = SNAPSHOTS.receive().await;
        let now_ms = snapshot.timestamp_ms;

        if pacer.phase_due(snapshot.phase, now_ms) {
            let mut line = heapless::String::<48>::new();
            if write_phase_line(snapshot.phase, now_ms, &mut line).is_ok() {
                esp_println::println!("{}", line);
            }
        }

        if pacer.status_due(now_ms) {
            let mut line = heapless::String::<LINE_OUT_MAX>::new();
            if write_status_line(&snapshot, &mut line).is_ok() {
                esp_println::println!("{}", line);
            }
        }
    }
}
