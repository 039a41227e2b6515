// @generated by threshold_config_compiler. Do not edit by hand.
pub const DEFAULT_THRESHOLDS: Thresholds = Thresholds {
    r1: 200,
    r2: 300,
    c1: 700,
    c2: 900,
    f1: 100,
    f2: 120,
    quietude_percent: 0.2,
    smoothing_window: 3,
    rate_smoothing_factor: 0.3,
    hysteresis_margin: 0.01,
    trend_buffer_size: 3,
};
