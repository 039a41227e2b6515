use super::*;
use crate::metrics::{
    alerts::{generate_alerts, Alert, AlertInputs},
    config::REFRESH_INTERVAL_MS,
    snapshot::{ratio, CompressionMetrics, CurrentCompression, CurrentRecoil, RecoilMetrics},
    types::elapsed_ms,
};

impl PhaseHsm {
    pub(in crate::metrics::engine) fn new(thresholds: Thresholds) -> Self {
        let mut alerts = Alerts::new();
        let _ = alerts.push(Alert::NoCompressions);
        Self::with_alerts(thresholds, alerts)
    }

    /// Fresh state that reports the refresh failure until the next refresh
    /// is due.
    pub(in crate::metrics::engine) fn after_fault(thresholds: Thresholds, now_ms: Millis) -> Self {
        let mut alerts = Alerts::new();
        let _ = alerts.push(Alert::RateCalculationError);
        let mut hsm = Self::with_alerts(thresholds, alerts);
        hsm.last_refresh_at = Some(now_ms);
        hsm
    }

    fn with_alerts(thresholds: Thresholds, alerts: Alerts) -> Self {
        Self {
            thresholds,
            phase: Phase::Quiet,
            phase_entered_at: None,
            smoothing: Window::new(thresholds.smoothing_len()),
            peak_window: Window::full_capacity(),
            trend: Window::new(thresholds.trend_len()),
            peak_trend: Window::full_capacity(),
            previous_smoothed: None,
            previous_peak_smoothed: None,
            smoothed_value: 0.0,
            peak_smoothed_value: 0.0,
            avg_slope: 0.0,
            avg_peak_slope: 0.0,
            session_peak: 0.0,
            current_compression_peak: 0.0,
            current_recoil_min: None,
            total_compressions: 0,
            good_compressions: 0,
            total_recoils: 0,
            good_recoils: 0,
            incomplete_recoils: 0,
            last_compression_ok: false,
            depth_history: Window::full_capacity(),
            recoil_history: Window::full_capacity(),
            peak_times: PeakTimes::full_capacity(),
            rate: RateEstimator::default(),
            cycle: CycleTracker::default(),
            alerts,
            last_refresh_at: None,
        }
    }

    pub(in crate::metrics::engine) fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub(in crate::metrics::engine) fn phase(&self) -> Phase {
        self.phase
    }

    pub(super) fn state_for(phase: Phase) -> State {
        match phase {
            Phase::Quiet => State::quiet(),
            Phase::Compression => State::compression(),
            Phase::Recoil => State::recoil(),
        }
    }

    /// Updates both smoothed series and their slope trends, then returns the
    /// phase the classifier picks for this tick.
    pub(super) fn observe(&mut self, raw: u16) -> Phase {
        let value = f32::from(raw);
        self.session_peak = self.session_peak.max(value);

        self.smoothing.push(value);
        self.smoothed_value = if self.smoothing.limit() <= 1 {
            value
        } else {
            self.smoothing.mean().unwrap_or(value)
        };
        self.peak_window.push(value);
        self.peak_smoothed_value = self.peak_window.mean().unwrap_or(value);

        let slope = self
            .previous_smoothed
            .map_or(0.0, |previous| self.smoothed_value - previous);
        self.previous_smoothed = Some(self.smoothed_value);
        let peak_slope = self
            .previous_peak_smoothed
            .map_or(0.0, |previous| self.peak_smoothed_value - previous);
        self.previous_peak_smoothed = Some(self.peak_smoothed_value);

        self.trend.push(slope);
        self.avg_slope = self.trend.mean().unwrap_or(0.0);
        self.peak_trend.push(peak_slope);
        self.avg_peak_slope = self.peak_trend.mean().unwrap_or(0.0);

        self.classify()
    }

    // First match wins; the branches are not mutually exclusive.
    fn classify(&self) -> Phase {
        let t = &self.thresholds;
        if self.avg_slope > t.slope_margin() && self.smoothed_value > t.min_compression_amplitude()
        {
            Phase::Compression
        } else if self.avg_slope < -t.recoil_slope_margin() {
            Phase::Recoil
        } else if self.smoothed_value <= t.quiet_ceiling() {
            Phase::Quiet
        } else {
            self.phase
        }
    }

    pub(super) fn change_phase(&mut self, next: Phase, now_ms: Millis) {
        let previous = self.phase;
        if previous.is_active() {
            if let Some(entered_at) = self.phase_entered_at {
                self.cycle.add_active(elapsed_ms(now_ms, entered_at));
            }
        }

        self.finalize_phase();
        self.phase = next;
        self.phase_entered_at = Some(now_ms);

        match next {
            Phase::Compression => {
                self.cycle.begin_compression(now_ms);
                self.current_compression_peak = self.peak_smoothed_value;
                self.total_compressions = self.total_compressions.saturating_add(1);
                self.peak_times.push(now_ms);
            }
            Phase::Recoil => {
                self.cycle.mark_recoil();
                self.current_recoil_min = Some(self.peak_smoothed_value);
                self.total_recoils = self.total_recoils.saturating_add(1);
            }
            Phase::Quiet => self.cycle.enter_quiet(now_ms),
        }

        log::debug!(
            "cpr: phase from={} to={} now_ms={} value={:.1} slope={:.1} peak_slope={:.1}",
            previous.label(),
            next.label(),
            now_ms,
            self.smoothed_value,
            self.avg_slope,
            self.avg_peak_slope
        );
    }

    fn finalize_phase(&mut self) {
        match self.phase {
            Phase::Compression => {
                let peak = self.current_compression_peak;
                self.last_compression_ok = self.thresholds.compression_in_band(peak);
                self.depth_history.push(peak);
            }
            Phase::Recoil => {
                if let Some(min) = self.current_recoil_min {
                    if self.thresholds.recoil_in_band(min) {
                        self.good_recoils = self.good_recoils.saturating_add(1);
                        if self.last_compression_ok {
                            self.good_compressions = self.good_compressions.saturating_add(1);
                        }
                    } else {
                        self.incomplete_recoils = self.incomplete_recoils.saturating_add(1);
                    }
                    // The grade is spent on the first recoil after it, good or
                    // incomplete, so good compressions never outnumber the
                    // compressions that were followed by a recoil.
                    self.last_compression_ok = false;
                    self.recoil_history.push(min);
                }
            }
            Phase::Quiet => {}
        }
        self.current_compression_peak = 0.0;
        self.current_recoil_min = None;
    }

    pub(super) fn poll_cycle(&mut self, now_ms: Millis) {
        if let Some(ccf) = self.cycle.poll_quiet(now_ms) {
            log::info!(
                "cpr: cycle_closed ccf={:.1} cycles={}",
                ccf,
                self.cycle.completed()
            );
        }
    }

    pub(super) fn finish_tick(&mut self, context: &mut DispatchContext, now_ms: Millis) {
        let due = self
            .last_refresh_at
            .is_none_or(|at| elapsed_ms(now_ms, at) >= REFRESH_INTERVAL_MS);
        if !due {
            return;
        }
        self.last_refresh_at = Some(now_ms);
        if let Err(fault) = self.refresh() {
            context.fault = Some(fault);
        }
    }

    fn refresh(&mut self) -> Result<(), RefreshFault> {
        if !self.smoothed_value.is_finite() {
            return Err(RefreshFault::NonFiniteAverage);
        }
        let rate = self
            .rate
            .refresh(&self.peak_times, self.thresholds.rate_smoothing_factor)?;

        let average_depth = self.depth_history.mean();
        let average_recoil_min = self.recoil_history.mean();
        if average_depth.is_some_and(|v| !v.is_finite())
            || average_recoil_min.is_some_and(|v| !v.is_finite())
        {
            return Err(RefreshFault::NonFiniteAverage);
        }

        let inputs = AlertInputs {
            peak_count: self.peak_times.len(),
            rate,
            average_depth,
            average_recoil_min,
        };
        self.alerts = generate_alerts(&inputs, &self.thresholds);
        Ok(())
    }

    pub(in crate::metrics::engine) fn snapshot(&self, now_ms: Millis) -> StatusSnapshot {
        let t = &self.thresholds;
        let compressing = self.phase == Phase::Compression;
        let peak_in_band = compressing && t.compression_in_band(self.current_compression_peak);
        let recoil_min = match (self.phase, self.current_recoil_min) {
            (Phase::Recoil, Some(min)) => Some(min),
            _ => None,
        };

        StatusSnapshot {
            phase: self.phase,
            rate: self.rate.displayed(),
            alerts: self.alerts.clone(),
            smoothed_value: self.smoothed_value,
            session_peak: self.session_peak,
            thresholds: self.thresholds,
            timestamp_ms: now_ms,
            compressions: CompressionMetrics {
                good: self.good_compressions,
                total: self.total_compressions,
                ratio: ratio(self.good_compressions, self.total_compressions),
                average_depth: self.depth_history.mean().unwrap_or(0.0),
                in_band: peak_in_band,
            },
            recoils: RecoilMetrics {
                good: self.good_recoils,
                incomplete: self.incomplete_recoils,
                total: self.total_recoils,
                ratio: ratio(self.good_recoils, self.total_recoils),
            },
            ccf: self.cycle.ccf(),
            cycles: self.cycle.completed(),
            current_compression: CurrentCompression {
                peak: self.current_compression_peak,
                in_band: peak_in_band,
            },
            current_recoil: CurrentRecoil {
                min: recoil_min.unwrap_or(0.0),
                in_band: recoil_min.is_some_and(|min| t.recoil_in_band(min)),
            },
        }
    }

    #[cfg(test)]
    pub(in crate::metrics::engine) fn depth_history(&self) -> impl Iterator<Item = f32> + '_ {
        self.depth_history.iter().copied()
    }

    #[cfg(test)]
    pub(in crate::metrics::engine) fn finalize_compression(&mut self, peak: f32) {
        self.phase = Phase::Compression;
        self.current_compression_peak = peak;
        self.finalize_phase();
        self.phase = Phase::Quiet;
    }
}
