use statig::prelude::*;

use super::*;
use crate::metrics::{
    alerts::Alerts,
    config::{MAX_SMOOTHING_WINDOW, MAX_TREND_WINDOW, PEAK_HISTORY_LEN, PEAK_WINDOW},
    cycle::CycleTracker,
    rate::{PeakTimes, RateEstimator},
    window::Window,
};

mod tracking;

pub(super) struct PhaseHsm {
    thresholds: Thresholds,
    phase: Phase,
    phase_entered_at: Option<Millis>,
    smoothing: Window<f32, MAX_SMOOTHING_WINDOW>,
    peak_window: Window<f32, PEAK_WINDOW>,
    trend: Window<f32, MAX_TREND_WINDOW>,
    peak_trend: Window<f32, PEAK_WINDOW>,
    previous_smoothed: Option<f32>,
    previous_peak_smoothed: Option<f32>,
    smoothed_value: f32,
    peak_smoothed_value: f32,
    avg_slope: f32,
    // Tracked alongside `avg_slope` but not consulted by the classifier yet.
    avg_peak_slope: f32,
    session_peak: f32,
    current_compression_peak: f32,
    current_recoil_min: Option<f32>,
    total_compressions: u32,
    good_compressions: u32,
    total_recoils: u32,
    good_recoils: u32,
    incomplete_recoils: u32,
    last_compression_ok: bool,
    depth_history: Window<f32, PEAK_HISTORY_LEN>,
    recoil_history: Window<f32, PEAK_HISTORY_LEN>,
    pub(super) peak_times: PeakTimes,
    pub(super) rate: RateEstimator,
    cycle: CycleTracker,
    alerts: Alerts,
    last_refresh_at: Option<Millis>,
}

#[state_machine(initial = "State::quiet()")]
impl PhaseHsm {
    #[state]
    fn quiet(&mut self, context: &mut DispatchContext, event: &PhaseEvent) -> Outcome<State> {
        match event {
            PhaseEvent::Sample { raw, now_ms } => {
                let next = self.observe(*raw);
                if next != Phase::Quiet {
                    self.change_phase(next, *now_ms);
                    self.finish_tick(context, *now_ms);
                    return Transition(Self::state_for(next));
                }
                self.poll_cycle(*now_ms);
                self.finish_tick(context, *now_ms);
                Handled
            }
        }
    }

    #[state]
    fn compression(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseEvent,
    ) -> Outcome<State> {
        match event {
            PhaseEvent::Sample { raw, now_ms } => {
                let next = self.observe(*raw);
                if next != Phase::Compression {
                    self.change_phase(next, *now_ms);
                    self.finish_tick(context, *now_ms);
                    return Transition(Self::state_for(next));
                }
                self.current_compression_peak =
                    self.current_compression_peak.max(self.peak_smoothed_value);
                self.finish_tick(context, *now_ms);
                Handled
            }
        }
    }

    #[state]
    fn recoil(&mut self, context: &mut DispatchContext, event: &PhaseEvent) -> Outcome<State> {
        match event {
            PhaseEvent::Sample { raw, now_ms } => {
                let next = self.observe(*raw);
                if next != Phase::Recoil {
                    self.change_phase(next, *now_ms);
                    self.finish_tick(context, *now_ms);
                    return Transition(Self::state_for(next));
                }
                let sample = self.peak_smoothed_value;
                self.current_recoil_min = Some(
                    self.current_recoil_min
                        .map_or(sample, |current| current.min(sample)),
                );
                self.finish_tick(context, *now_ms);
                Handled
            }
        }
    }
}
