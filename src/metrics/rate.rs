use heapless::Vec;

use super::{
    config::{MAX_PEAK_INTERVAL_S, MIN_PEAK_INTERVAL_S, PEAK_TIMES_LEN},
    types::{elapsed_ms, Millis},
    window::Window,
};

pub type PeakTimes = Window<Millis, PEAK_TIMES_LEN>;

/// Numeric fault raised while refreshing rate or alerts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshFault {
    NonFiniteInterval,
    NonFiniteRate,
    NonFiniteAverage,
}

impl RefreshFault {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NonFiniteInterval => "non_finite_interval",
            Self::NonFiniteRate => "non_finite_rate",
            Self::NonFiniteAverage => "non_finite_average",
        }
    }
}

/// Median of consecutive peak spacings in seconds. With an even count the
/// upper middle value is taken.
pub fn median_interval_s(times: &PeakTimes) -> Option<f32> {
    let mut intervals: Vec<f32, PEAK_TIMES_LEN> = Vec::new();
    let mut previous: Option<Millis> = None;
    for &at in times.iter() {
        if let Some(before) = previous {
            let _ = intervals.push(elapsed_ms(at, before) as f32 / 1_000.0);
        }
        previous = Some(at);
    }
    if intervals.is_empty() {
        return None;
    }
    intervals.sort_unstable_by(f32::total_cmp);
    intervals.get(intervals.len() / 2).copied()
}

pub(crate) fn round_rate(rate: f32) -> u16 {
    if rate <= 0.0 {
        return 0;
    }
    (rate + 0.5) as u16
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RateEstimator {
    pub(crate) smoothed: Option<f32>,
    displayed: u16,
}

impl RateEstimator {
    pub fn displayed(&self) -> u16 {
        self.displayed
    }

    /// Recomputes the displayed rate from the retained peak timestamps.
    /// Fewer than two peaks shows 0 but keeps the smoothing history.
    pub fn refresh(&mut self, times: &PeakTimes, alpha: f32) -> Result<u16, RefreshFault> {
        let Some(median) = median_interval_s(times) else {
            self.displayed = 0;
            return Ok(0);
        };
        if !median.is_finite() {
            return Err(RefreshFault::NonFiniteInterval);
        }

        let clamped = median.clamp(MIN_PEAK_INTERVAL_S, MAX_PEAK_INTERVAL_S);
        let raw_rate = 60.0 / clamped;
        let next = match self.smoothed {
            None => raw_rate,
            Some(previous) => alpha * raw_rate + (1.0 - alpha) * previous,
        };
        if !next.is_finite() {
            return Err(RefreshFault::NonFiniteRate);
        }

        self.smoothed = Some(next);
        self.displayed = round_rate(next);
        Ok(self.displayed)
    }
}
