use super::{alerts::Alerts, config::Thresholds, types::Millis, types::Phase};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompressionMetrics {
    pub good: u32,
    pub total: u32,
    pub ratio: f32,
    /// Rolling mean of finalized peaks, 0 before the first one.
    pub average_depth: f32,
    pub in_band: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecoilMetrics {
    pub good: u32,
    pub incomplete: u32,
    pub total: u32,
    pub ratio: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurrentCompression {
    pub peak: f32,
    pub in_band: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurrentRecoil {
    /// 0 while no minimum has been recorded in this recoil.
    pub min: f32,
    pub in_band: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub rate: u16,
    pub alerts: Alerts,
    pub smoothed_value: f32,
    pub session_peak: f32,
    pub thresholds: Thresholds,
    pub timestamp_ms: Millis,
    pub compressions: CompressionMetrics,
    pub recoils: RecoilMetrics,
    pub ccf: f32,
    pub cycles: u32,
    pub current_compression: CurrentCompression,
    pub current_recoil: CurrentRecoil,
}

pub(crate) fn ratio(good: u32, total: u32) -> f32 {
    if total == 0 {
        return 0.0;
    }
    good as f32 / total as f32
}
