use super::*;
use crate::metrics::{
    alerts::Alert,
    snapshot::{CompressionMetrics, RecoilMetrics},
};

const TICK_MS: Millis = 25;

struct Run {
    engine: CompressionStateEngine,
    now_ms: Millis,
    transitions: Vec<(Millis, Phase)>,
    last: Option<StatusSnapshot>,
}

impl Run {
    fn new(engine: CompressionStateEngine, start_ms: Millis) -> Self {
        Self {
            engine,
            now_ms: start_ms,
            transitions: Vec::new(),
            last: None,
        }
    }

    fn feed(&mut self, samples: &[u16]) -> &StatusSnapshot {
        for &raw in samples {
            let before = self.engine.phase();
            let snapshot = self.engine.process_sample(raw, self.now_ms);
            if snapshot.phase != before {
                self.transitions.push((self.now_ms, snapshot.phase));
            }
            self.last = Some(snapshot);
            self.now_ms = self.now_ms.wrapping_add(TICK_MS);
        }
        self.last.as_ref().expect("at least one sample fed")
    }

    fn hold(&mut self, raw: u16, duration_ms: Millis) -> &StatusSnapshot {
        let ticks = (duration_ms / TICK_MS) as usize;
        self.feed(&vec![raw; ticks])
    }

    fn phases(&self) -> Vec<Phase> {
        self.transitions.iter().map(|&(_, phase)| phase).collect()
    }
}

const BASELINE: [u16; 4] = [200; 4];
const RAMP_UP: [u16; 5] = [350, 500, 650, 800, 950];
const RAMP_DOWN: [u16; 5] = [800, 650, 500, 350, 200];

fn triangle(period_ticks: u32, ticks: u32) -> Vec<u16> {
    let half = period_ticks / 2;
    (0..ticks)
        .map(|i| {
            let p = i % period_ticks;
            let value = if p <= half {
                200 + 700 * p / half
            } else {
                900 - 700 * (p - half) / half
            };
            value as u16
        })
        .collect()
}

fn assert_fresh(snapshot: &StatusSnapshot) {
    assert_eq!(snapshot.phase, Phase::Quiet);
    assert_eq!(snapshot.rate, 0);
    assert_eq!(snapshot.alerts.as_slice(), &[Alert::NoCompressions]);
    assert_eq!(snapshot.compressions, CompressionMetrics::default());
    assert_eq!(snapshot.recoils, RecoilMetrics::default());
    assert_eq!(snapshot.cycles, 0);
    assert_eq!(snapshot.ccf, 0.0);
    assert_eq!(snapshot.current_recoil.min, 0.0);
}

#[test]
fn reset_twice_matches_reset_once() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    run.feed(&BASELINE);
    run.feed(&RAMP_UP);
    let mut once = run.engine;
    once.reset();

    let mut twice = CompressionStateEngine::default();

    twice.reset();
    twice.reset();

    assert_eq!(once.snapshot(5_000), twice.snapshot(5_000));
    assert_fresh(&twice.snapshot(5_000));
}

#[test]
fn round_trip_closes_one_good_cycle() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    run.feed(&BASELINE);
    run.feed(&RAMP_UP);

    let compressing = run.last.clone().expect("snapshot");
    assert_eq!(compressing.phase, Phase::Compression);
    assert_eq!(compressing.current_compression.peak, 800.0);
    assert!(compressing.current_compression.in_band);
    assert!(compressing.compressions.in_band);

    run.feed(&RAMP_DOWN);
    let done = run.hold(200, 2_200).clone();

    assert_eq!(
        run.transitions,
        vec![
            (150, Phase::Compression),
            (275, Phase::Recoil),
            (450, Phase::Quiet)
        ]
    );
    assert_eq!(done.cycles, 1);
    assert!(done.ccf > 0.0 && done.ccf <= 100.0);
    assert!((done.ccf - 13.043).abs() < 0.01, "ccf {}", done.ccf);
    assert_eq!(done.compressions.good, 1);
    assert_eq!(done.compressions.total, 1);
    assert_eq!(done.compressions.ratio, 1.0);
    assert_eq!(done.compressions.average_depth, 850.0);
    assert_eq!(done.recoils.good, 1);
    assert_eq!(done.recoils.incomplete, 0);
    assert_eq!(done.recoils.total, 1);
    assert_eq!(done.session_peak, 950.0);
    assert_eq!(done.alerts.as_slice(), &[Alert::NeedMoreData]);
}

#[test]
fn round_trip_survives_clock_wrap() {
    let start = u32::MAX - 300;
    let mut run = Run::new(CompressionStateEngine::default(), start);
    run.feed(&BASELINE);
    run.feed(&RAMP_UP);
    run.feed(&RAMP_DOWN);
    let done = run.hold(200, 2_200).clone();

    assert_eq!(
        run.phases(),
        vec![Phase::Compression, Phase::Recoil, Phase::Quiet]
    );
    assert_eq!(run.transitions[2].0, 149);
    assert_eq!(done.cycles, 1);
    assert!((done.ccf - 13.043).abs() < 0.01, "ccf {}", done.ccf);
}

#[test]
fn recoil_dip_before_first_compression_leaves_ccf_alone() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    run.feed(&BASELINE);
    run.feed(&[120, 40, 0, 0]);
    run.hold(200, 60_000);
    run.feed(&RAMP_UP);
    run.feed(&RAMP_DOWN);
    let done = run.hold(200, 2_200).clone();

    assert_eq!(
        run.transitions,
        vec![
            (125, Phase::Recoil),
            (225, Phase::Quiet),
            (60_250, Phase::Compression),
            (60_375, Phase::Recoil),
            (60_550, Phase::Quiet)
        ]
    );
    assert_eq!(done.cycles, 1);
    assert!((done.ccf - 13.043).abs() < 0.01, "ccf {}", done.ccf);
    assert_eq!(done.compressions.total, 1);
    assert_eq!(done.recoils.total, 2);
}

#[test]
fn recoil_min_is_reported_only_during_recoil() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    assert_eq!(run.feed(&BASELINE).current_recoil.min, 0.0);
    assert_eq!(run.feed(&RAMP_UP).current_recoil.min, 0.0);

    let recoiling = run.feed(&RAMP_DOWN).clone();
    assert_eq!(recoiling.phase, Phase::Recoil);
    assert_eq!(recoiling.current_recoil.min, 350.0);
    assert!(!recoiling.current_recoil.in_band);

    let quiet = run.hold(200, 200).clone();
    assert_eq!(quiet.phase, Phase::Quiet);
    assert_eq!(quiet.current_recoil.min, 0.0);
    assert!(!quiet.current_recoil.in_band);
}

#[test]
fn shallow_recoil_withholds_good_compression() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    run.feed(&BASELINE);
    run.feed(&RAMP_UP);
    let snapshot = run
        .feed(&[800, 650, 500, 400, 400, 400, 400, 550, 700])
        .clone();

    assert_eq!(
        run.transitions,
        vec![
            (150, Phase::Compression),
            (275, Phase::Recoil),
            (425, Phase::Compression)
        ]
    );
    assert_eq!(snapshot.compressions.good, 0);
    assert_eq!(snapshot.compressions.total, 2);
    assert_eq!(snapshot.recoils.good, 0);
    assert_eq!(snapshot.recoils.incomplete, 1);
    assert_eq!(snapshot.recoils.total, 1);
    assert_eq!(snapshot.recoils.ratio, 0.0);
}

#[test]
fn compression_without_recoil_discards_cycle() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    run.feed(&BASELINE);
    run.feed(&[350, 500, 650]);
    let descent: Vec<u16> = (20..=64).rev().map(|v| v * 10).collect();
    run.feed(&descent);
    let done = run.hold(200, 2_200).clone();

    assert_eq!(
        run.transitions,
        vec![(150, Phase::Compression), (950, Phase::Quiet)]
    );
    assert_eq!(done.cycles, 0);
    assert_eq!(done.ccf, 0.0);
    assert_eq!(done.compressions.total, 1);
    assert_eq!(done.compressions.good, 0);
    assert_eq!(done.compressions.average_depth, 640.0);
    assert_eq!(
        done.alerts.as_slice(),
        &[Alert::NeedMoreData, Alert::TooShallow]
    );
}

#[test]
fn steady_hundred_per_minute_is_in_band() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    let snapshot = run.feed(&triangle(24, 12 * 40)).clone();

    assert_eq!(snapshot.rate, 100);
    assert!(snapshot.alerts.is_empty(), "alerts {:?}", snapshot.alerts);
    assert_eq!(snapshot.compressions.total, 20);
    assert_eq!(snapshot.compressions.good, 19);
    assert_eq!(snapshot.recoils.good, 19);
    assert_eq!(snapshot.cycles, 0);
}

#[test]
fn slow_compressions_raise_rate_too_low() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    let snapshot = run.feed(&triangle(40, 12 * 40)).clone();

    assert_eq!(snapshot.rate, 60);
    assert_eq!(
        snapshot.alerts.as_slice(),
        &[Alert::RateTooLow { rate: 60, min: 100 }]
    );
}

#[test]
fn no_compressions_hides_rate_band_alerts() {
    let thresholds = Thresholds {
        f1: 500,
        f2: 600,
        ..Thresholds::default()
    };
    let mut run = Run::new(CompressionStateEngine::new(thresholds), 10_000);
    let snapshot = run.hold(200, 3_000);
    assert_eq!(snapshot.alerts.as_slice(), &[Alert::NoCompressions]);
}

#[test]
fn configure_resets_derived_state() {
    let mut run = Run::new(CompressionStateEngine::default(), 0);
    run.feed(&triangle(24, 4 * 40));
    let mut engine = run.engine;
    assert!(engine.snapshot(0).compressions.total > 0);

    let stricter = Thresholds {
        c1: 750,
        ..Thresholds::default()
    };
    engine.configure(stricter);

    let snapshot = engine.snapshot(4_000);
    assert_fresh(&snapshot);
    assert_eq!(snapshot.thresholds, stricter);
    assert_eq!(engine.thresholds(), stricter);
}

#[test]
fn single_sample_window_passes_raw_value_through() {
    let thresholds = Thresholds {
        smoothing_window: 1,
        ..Thresholds::default()
    };
    let mut engine = CompressionStateEngine::new(thresholds);
    engine.process_sample(200, 0);
    let snapshot = engine.process_sample(333, 25);
    assert_eq!(snapshot.smoothed_value, 333.0);
}

#[test]
fn finalized_peak_history_keeps_latest_hundred() {
    let mut hsm = PhaseHsm::new(Thresholds::default());
    for peak in 0..150 {
        hsm.finalize_compression(peak as f32);
    }
    let kept: Vec<f32> = hsm.depth_history().collect();
    let expected: Vec<f32> = (50..150).map(|v| v as f32).collect();
    assert_eq!(kept, expected);
}

#[test]
fn refresh_fault_degrades_to_clean_state() {
    let mut hsm = PhaseHsm::new(Thresholds::default());
    hsm.peak_times.push(1_000);
    hsm.peak_times.push(1_500);
    hsm.rate.smoothed = Some(f32::NAN);
    let mut engine = CompressionStateEngine::from_hsm(hsm);

    let faulted = engine.process_sample(200, 2_000);
    assert_eq!(faulted.alerts.as_slice(), &[Alert::RateCalculationError]);
    assert_eq!(faulted.rate, 0);
    assert_eq!(faulted.compressions, CompressionMetrics::default());
    assert_eq!(faulted.phase, Phase::Quiet);

    let held = engine.process_sample(200, 2_025);
    assert_eq!(held.alerts.as_slice(), &[Alert::RateCalculationError]);

    // The next refresh replaces the error with regular alerts.
    let recovered = engine.process_sample(200, 3_000);
    assert_eq!(recovered.alerts.as_slice(), &[Alert::NoCompressions]);
}
