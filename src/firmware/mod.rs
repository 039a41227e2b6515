mod config;
mod sampler;
mod serial;
mod status;
mod store;
mod types;

use esp_hal::{
    analog::adc::{Adc, AdcConfig, Attenuation},
    timer::timg::TimerGroup,
    uart::{Config as UartConfig, Uart},
};

use cpr_trainer::{metrics::CompressionStateEngine, session::TrainingSession};

use self::{config::UART_BAUD, store::SettingsStore, types::SamplerContext};

pub(crate) fn run() -> ! {
    esp_println::logger::init_logger(log::LevelFilter::Info);

    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let uart_cfg = UartConfig::default().with_baudrate(UART_BAUD);
    let uart = match Uart::new(peripherals.UART0, uart_cfg) {
        Ok(uart) => uart
            .with_rx(peripherals.GPIO3)
            .with_tx(peripherals.GPIO1)
            .into_async(),
        Err(_) => {
            log::error!("boot: uart0 init failed");
            halt_forever();
        }
    };

    let mut adc_config = AdcConfig::new();
    let pin = adc_config.enable_pin(peripherals.GPIO36, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);

    let mut store = SettingsStore::new(peripherals.FLASH);
    let settings = match store.load() {
        Some(settings) => {
            log::info!("boot: settings source=flash");
            settings
        }
        None => {
            log::info!("boot: settings source=defaults");
            Default::default()
        }
    };
    let t = settings.thresholds;
    log::info!(
        "boot: thresholds r1={} r2={} c1={} c2={} f1={} f2={} window={} trend={} last_session={}",
        t.r1,
        t.r2,
        t.c1,
        t.c2,
        t.f1,
        t.f2,
        t.smoothing_window,
        t.trend_buffer_size,
        settings.last_session_id
    );

    let sampler = SamplerContext {
        adc,
        pin,
        engine: CompressionStateEngine::new(settings.thresholds),
        session: TrainingSession::new(settings.last_session_id),
        store,
    };

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(sampler::sampler_task(sampler));
        spawner.must_spawn(status::status_task());
        spawner.must_spawn(serial::serial_task(uart));
    });
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
