//! On-target smoke test: the engine and the ADC path run on the ESP32 executor.

#![no_std]
#![no_main]

#[cfg(test)]
#[embedded_test::tests(executor = esp_rtos::embassy::Executor::new())]
mod tests {
    use cpr_trainer::{
        metrics::{CompressionStateEngine, Phase},
        sensor::scale_to_sensor_domain,
    };

    #[init]
    fn init() {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let timg0 = esp_hal::timer::timg::TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);
    }

    #[test]
    async fn engine_detects_compression_on_target() {
        let mut engine = CompressionStateEngine::default();
        let mut now_ms = 0u32;
        for raw in [200u16, 200, 200, 200, 350, 500, 650, 800, 950] {
            engine.process_sample(raw, now_ms);
            now_ms += 25;
            embassy_time::Timer::after(embassy_time::Duration::from_millis(1)).await;
        }
        assert_eq!(engine.phase(), Phase::Compression);
    }

    #[test]
    fn full_scale_adc_maps_to_sensor_max() {
        assert_eq!(scale_to_sensor_domain(4095), 1023);
        assert_eq!(scale_to_sensor_domain(0), 0);
    }
}
