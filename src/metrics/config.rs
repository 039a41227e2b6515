use core::fmt;

use super::types::Millis;

/// Largest value the sampling driver delivers (10-bit force domain).
pub const SENSOR_MAX: u16 = 1023;

pub const PEAK_WINDOW: usize = 3;
pub const PEAK_HISTORY_LEN: usize = 100;
pub const PEAK_TIMES_LEN: usize = 10;
pub const MAX_SMOOTHING_WINDOW: usize = 32;
pub const MAX_TREND_WINDOW: usize = 32;

pub const CYCLE_QUIET_DWELL_MS: Millis = 2_000;
pub const REFRESH_INTERVAL_MS: Millis = 1_000;

/// Inter-peak interval clamp in seconds (240..=40 per minute).
pub const MIN_PEAK_INTERVAL_S: f32 = 0.25;
pub const MAX_PEAK_INTERVAL_S: f32 = 1.5;

const RECOIL_SLOPE_FACTOR: f32 = 1.5;
const SLOPE_MARGIN_SCALE: f32 = 1_000.0;

/// Clinical thresholds. Replacing them through `configure` resets every
/// derived buffer in the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub r1: i32,
    pub r2: i32,
    pub c1: i32,
    pub c2: i32,
    pub f1: i32,
    pub f2: i32,
    pub quietude_percent: f32,
    pub smoothing_window: u8,
    pub rate_smoothing_factor: f32,
    pub hysteresis_margin: f32,
    pub trend_buffer_size: u8,
}

include!(concat!(env!("OUT_DIR"), "/threshold_config.rs"));

impl Default for Thresholds {
    fn default() -> Self {
        DEFAULT_THRESHOLDS
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdError {
    RecoilBandInverted,
    CompressionBandInverted,
    RateMinNotPositive,
    RateBandInverted,
    SmoothingFactorOutOfRange,
    QuietudeOutOfRange,
    SmoothingWindowOutOfRange,
    TrendWindowOutOfRange,
    HysteresisMarginInvalid,
}

impl ThresholdError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RecoilBandInverted => "recoil_band_inverted",
            Self::CompressionBandInverted => "compression_band_inverted",
            Self::RateMinNotPositive => "rate_min_not_positive",
            Self::RateBandInverted => "rate_band_inverted",
            Self::SmoothingFactorOutOfRange => "smoothing_factor_range",
            Self::QuietudeOutOfRange => "quietude_range",
            Self::SmoothingWindowOutOfRange => "smoothing_window_range",
            Self::TrendWindowOutOfRange => "trend_window_range",
            Self::HysteresisMarginInvalid => "hysteresis_margin",
        }
    }
}

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Thresholds {
    /// Rejects records the console or the build must not accept. The engine
    /// itself never calls this and runs degenerate thresholds as given.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        if self.r1 > self.r2 {
            return Err(ThresholdError::RecoilBandInverted);
        }
        if self.c1 > self.c2 {
            return Err(ThresholdError::CompressionBandInverted);
        }
        if self.f1 <= 0 {
            return Err(ThresholdError::RateMinNotPositive);
        }
        if self.f1 > self.f2 {
            return Err(ThresholdError::RateBandInverted);
        }
        let alpha = self.rate_smoothing_factor;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ThresholdError::SmoothingFactorOutOfRange);
        }
        if !(0.0..=1.0).contains(&self.quietude_percent) {
            return Err(ThresholdError::QuietudeOutOfRange);
        }
        if !(1..=MAX_SMOOTHING_WINDOW).contains(&usize::from(self.smoothing_window)) {
            return Err(ThresholdError::SmoothingWindowOutOfRange);
        }
        if !(1..=MAX_TREND_WINDOW).contains(&usize::from(self.trend_buffer_size)) {
            return Err(ThresholdError::TrendWindowOutOfRange);
        }
        if !self.hysteresis_margin.is_finite() || self.hysteresis_margin < 0.0 {
            return Err(ThresholdError::HysteresisMarginInvalid);
        }
        Ok(())
    }

    pub fn operating_range(&self) -> f32 {
        self.c2 as f32 - self.r1 as f32
    }

    pub fn quiet_ceiling(&self) -> f32 {
        self.r1 as f32 + self.quietude_percent * self.operating_range()
    }

    pub fn min_compression_amplitude(&self) -> f32 {
        0.5 * self.c1 as f32
    }

    /// Normalized hysteresis scaled into sensor units.
    pub fn slope_margin(&self) -> f32 {
        self.hysteresis_margin * SLOPE_MARGIN_SCALE
    }

    pub fn recoil_slope_margin(&self) -> f32 {
        RECOIL_SLOPE_FACTOR * self.slope_margin()
    }

    pub fn compression_in_band(&self, peak: f32) -> bool {
        self.c1 as f32 <= peak && peak <= self.c2 as f32
    }

    pub fn recoil_in_band(&self, min: f32) -> bool {
        min <= self.r2 as f32
    }

    pub fn smoothing_len(&self) -> usize {
        usize::from(self.smoothing_window).clamp(1, MAX_SMOOTHING_WINDOW)
    }

    pub fn trend_len(&self) -> usize {
        usize::from(self.trend_buffer_size).clamp(1, MAX_TREND_WINDOW)
    }
}
