//! Line-oriented status output for the serial console and any host reading it.

use core::fmt::{self, Write};

use crate::metrics::{elapsed_ms, Alerts, Millis, Phase, StatusSnapshot, Thresholds};

pub const STATUS_INTERVAL_MS: Millis = 500;
pub const PHASE_INTERVAL_MS: Millis = 50;

pub fn write_status_line(snapshot: &StatusSnapshot, out: &mut impl Write) -> fmt::Result {
    let c = &snapshot.compressions;
    let r = &snapshot.recoils;
    write!(
        out,
        "METRICS ts={} state={} rate={} value={:.1} peak={:.1} good={}/{} ratio={:.2} \
         avg_depth={:.1} in_band={} recoil_good={} recoil_incomplete={} recoil_total={} \
         recoil_ratio={:.2} ccf={:.1} cycles={} cur_peak={:.1} cur_peak_ok={} \
         cur_min={:.1} cur_min_ok={} alerts=",
        snapshot.timestamp_ms,
        snapshot.phase.label(),
        snapshot.rate,
        snapshot.smoothed_value,
        snapshot.session_peak,
        c.good,
        c.total,
        c.ratio,
        c.average_depth,
        u8::from(c.in_band),
        r.good,
        r.incomplete,
        r.total,
        r.ratio,
        snapshot.ccf,
        snapshot.cycles,
        snapshot.current_compression.peak,
        u8::from(snapshot.current_compression.in_band),
        snapshot.current_recoil.min,
        u8::from(snapshot.current_recoil.in_band),
    )?;
    write_alert_codes(&snapshot.alerts, out)
}

fn write_alert_codes(alerts: &Alerts, out: &mut impl Write) -> fmt::Result {
    if alerts.is_empty() {
        return out.write_char('-');
    }
    for (i, alert) in alerts.iter().enumerate() {
        if i > 0 {
            out.write_char('|')?;
        }
        out.write_str(alert.code())?;
    }
    Ok(())
}

/// Human-readable alert text, `; ` separated.
pub fn write_alert_text(alerts: &Alerts, out: &mut impl Write) -> fmt::Result {
    for (i, alert) in alerts.iter().enumerate() {
        if i > 0 {
            out.write_str("; ")?;
        }
        write!(out, "{alert}")?;
    }
    Ok(())
}

pub fn write_phase_line(phase: Phase, now_ms: Millis, out: &mut impl Write) -> fmt::Result {
    write!(out, "PHASE ts={} state={}", now_ms, phase.label())
}

pub fn write_thresholds_line(t: &Thresholds, out: &mut impl Write) -> fmt::Result {
    write!(
        out,
        "THRESH r1={} r2={} c1={} c2={} f1={} f2={} quietude_percent={} smoothing_window={} \
         rate_smoothing_factor={} hysteresis_margin={} trend_buffer_size={}",
        t.r1,
        t.r2,
        t.c1,
        t.c2,
        t.f1,
        t.f2,
        t.quietude_percent,
        t.smoothing_window,
        t.rate_smoothing_factor,
        t.hysteresis_margin,
        t.trend_buffer_size
    )
}

/// Decides which snapshots reach the wire: full status at 2 Hz, phase
/// changes at up to 20 Hz.
#[derive(Clone, Copy, Debug, Default)]
pub struct TelemetryPacer {
    last_status_at: Option<Millis>,
    last_phase_at: Option<Millis>,
    last_phase: Option<Phase>,
}

impl TelemetryPacer {
    pub fn status_due(&mut self, now_ms: Millis) -> bool {
        let due = self
            .last_status_at
            .is_none_or(|at| elapsed_ms(now_ms, at) >= STATUS_INTERVAL_MS);
        if due {
            self.last_status_at = Some(now_ms);
        }
        due
    }

    /// A change that arrives inside the pacing window is held back and
    /// reported once the window has passed, if the phase still differs.
    pub fn phase_due(&mut self, phase: Phase, now_ms: Millis) -> bool {
        if self.last_phase == Some(phase) {
            return false;
        }
        let due = self
            .last_phase_at
            .is_none_or(|at| elapsed_ms(now_ms, at) >= PHASE_INTERVAL_MS);
        if due {
            self.last_phase = Some(phase);
            self.last_phase_at = Some(now_ms);
        }
        due
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
