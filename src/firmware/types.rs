use cpr_trainer::{metrics::CompressionStateEngine, session::TrainingSession};
use esp_hal::{
    analog::adc::{Adc, AdcPin},
    peripherals::{ADC1, GPIO36},
    uart::Uart,
    Async, Blocking,
};

use super::store::SettingsStore;

pub(crate) type SerialUart = Uart<'static, Async>;
pub(crate) type SensorAdc = Adc<'static, ADC1<'static>, Blocking>;
pub(crate) type SensorPin = AdcPin<GPIO36<'static>, ADC1<'static>>;

/// Everything the sampler task owns exclusively.
pub(crate) struct SamplerContext {
    pub(crate) adc: SensorAdc,
    pub(crate) pin: SensorPin,
    pub(crate) engine: CompressionStateEngine,
    pub(crate) session: TrainingSession,
    pub(crate) store: SettingsStore<'static>,
}
