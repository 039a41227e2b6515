use core::fmt;

use heapless::Vec;

use super::config::Thresholds;

/// One rate alert plus one depth and one recoil alert at most.
pub const MAX_ALERTS: usize = 4;

pub type Alerts = Vec<Alert, MAX_ALERTS>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alert {
    NoCompressions,
    NeedMoreData,
    RateTooLow { rate: u16, min: i32 },
    RateTooHigh { rate: u16, max: i32 },
    TooDeep,
    TooShallow,
    IncompleteRecoil,
    RateCalculationError,
}

impl Alert {
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoCompressions => "no_compressions",
            Self::NeedMoreData => "need_more_data",
            Self::RateTooLow { .. } => "rate_low",
            Self::RateTooHigh { .. } => "rate_high",
            Self::TooDeep => "too_deep",
            Self::TooShallow => "too_shallow",
            Self::IncompleteRecoil => "incomplete_recoil",
            Self::RateCalculationError => "rate_error",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NoCompressions => f.write_str("No compressions detected"),
            Self::NeedMoreData => f.write_str("Need more compressions for rate"),
            Self::RateTooLow { rate, min } => write!(f, "CPR rate too low ({rate} < {min})"),
            Self::RateTooHigh { rate, max } => write!(f, "CPR rate too high ({rate} > {max})"),
            Self::TooDeep => f.write_str("Be gentle"),
            Self::TooShallow => f.write_str("Press harder"),
            Self::IncompleteRecoil => f.write_str("Release more"),
            Self::RateCalculationError => f.write_str("Rate calculation error"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlertInputs {
    /// Compression-peak timestamps currently retained for rate estimation.
    pub peak_count: usize,
    pub rate: u16,
    pub average_depth: Option<f32>,
    pub average_recoil_min: Option<f32>,
}

pub fn generate_alerts(inputs: &AlertInputs, thresholds: &Thresholds) -> Alerts {
    let mut alerts = Alerts::new();
    let rate = i32::from(inputs.rate);

    let rate_alert = if inputs.peak_count == 0 {
        Some(Alert::NoCompressions)
    } else if inputs.peak_count < 2 {
        Some(Alert::NeedMoreData)
    } else if rate < thresholds.f1 {
        Some(Alert::RateTooLow {
            rate: inputs.rate,
            min: thresholds.f1,
        })
    } else if rate > thresholds.f2 {
        Some(Alert::RateTooHigh {
            rate: inputs.rate,
            max: thresholds.f2,
        })
    } else {
        None
    };
    if let Some(alert) = rate_alert {
        let _ = alerts.push(alert);
    }

    if let Some(depth) = inputs.average_depth {
        if depth > thresholds.c2 as f32 {
            let _ = alerts.push(Alert::TooDeep);
        } else if depth < thresholds.c1 as f32 {
            let _ = alerts.push(Alert::TooShallow);
        }
    }

    if let Some(recoil) = inputs.average_recoil_min {
        if recoil > thresholds.r2 as f32 {
            let _ = alerts.push(Alert::IncompleteRecoil);
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_compressions_suppresses_rate_band_check() {
        let thresholds = Thresholds {
            f1: 500,
            f2: 600,
            ..Thresholds::default()
        };
        let alerts = generate_alerts(&AlertInputs::default(), &thresholds);
        assert_eq!(alerts.as_slice(), &[Alert::NoCompressions]);
    }

    #[test]
    fn single_peak_asks_for_more_data() {
        let inputs = AlertInputs {
            peak_count: 1,
            average_depth: Some(800.0),
            ..AlertInputs::default()
        };
        let alerts = generate_alerts(&inputs, &Thresholds::default());
        assert_eq!(alerts.as_slice(), &[Alert::NeedMoreData]);
    }

    #[test]
    fn rate_depth_and_recoil_alerts_stack_in_order() {
        let inputs = AlertInputs {
            peak_count: 5,
            rate: 87,
            average_depth: Some(950.0),
            average_recoil_min: Some(320.0),
        };
        let alerts = generate_alerts(&inputs, &Thresholds::default());
        assert_eq!(
            alerts.as_slice(),
            &[
                Alert::RateTooLow { rate: 87, min: 100 },
                Alert::TooDeep,
                Alert::IncompleteRecoil
            ]
        );
    }

    #[test]
    fn in_band_session_is_silent() {
        let inputs = AlertInputs {
            peak_count: 10,
            rate: 110,
            average_depth: Some(800.0),
            average_recoil_min: Some(250.0),
        };
        assert!(generate_alerts(&inputs, &Thresholds::default()).is_empty());
    }

    #[test]
    fn shallow_and_fast_render_human_strings() {
        let inputs = AlertInputs {
            peak_count: 3,
            rate: 130,
            average_depth: Some(600.0),
            average_recoil_min: None,
        };
        let alerts = generate_alerts(&inputs, &Thresholds::default());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].to_string(), "CPR rate too high (130 > 120)");
        assert_eq!(alerts[1].to_string(), "Press harder");
        assert_eq!(alerts[0].code(), "rate_high");
    }
}
