//! Compression/recoil phase detection and the clinical metrics derived from it.

pub mod alerts;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod rate;
pub mod snapshot;
pub mod types;
pub mod window;

pub use alerts::{generate_alerts, Alert, AlertInputs, Alerts};
pub use config::{ThresholdError, Thresholds, DEFAULT_THRESHOLDS};
pub use engine::CompressionStateEngine;
pub use rate::{RateEstimator, RefreshFault};
pub use snapshot::{
    CompressionMetrics, CurrentCompression, CurrentRecoil, RecoilMetrics, StatusSnapshot,
};
pub use types::{elapsed_ms, Millis, Phase};
