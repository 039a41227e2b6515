use cpr_trainer::{
    console::apply_command, sensor::scale_to_sensor_domain, settings::PersistedSettings,
};
use embassy_time::{Duration, Instant, Ticker};

use super::{
    config::{CONSOLE_COMMANDS, CONSOLE_REPLIES, SAMPLE_INTERVAL_MS, SNAPSHOTS},
    types::{SamplerContext, SensorAdc, SensorPin},
};

#[embassy_executor::task]
pub(crate) async fn sampler_task(mut context: SamplerContext) {
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));

    loop {
        ticker.next().await;
        let now_ms = now_ms();

        while let Ok(command) = CONSOLE_COMMANDS.try_receive() {
            let applied =
                apply_command(command, &mut context.engine, &mut context.session, now_ms);
            if applied.persist {
                context.store.save(PersistedSettings {
                    thresholds: context.engine.thresholds(),
                    last_session_id: context.session.last_id(),
                });
            }
            if CONSOLE_REPLIES.try_send(applied.reply).is_err() {
                log::warn!("sampler: reply dropped reason=queue_full");
            }
        }

        let raw = read_raw(&mut context.adc, &mut context.pin);
        let snapshot = context
            .engine
            .process_sample(scale_to_sensor_domain(raw), now_ms);
        // Stale snapshots go first; the newest always gets a slot.
        if SNAPSHOTS.is_full() {
            let _ = SNAPSHOTS.try_receive();
        }
        let _ = SNAPSHOTS.try_send(snapshot);
    }
}

fn read_raw(adc: &mut SensorAdc, pin: &mut SensorPin) -> u16 {
    loop {
        if let Ok(value) = adc.read_oneshot(pin) {
            return value;
        }
        core::hint::spin_loop();
    }
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
