use super::{
    config::CYCLE_QUIET_DWELL_MS,
    types::{elapsed_ms, Millis},
};

/// Chest-compression-fraction bookkeeping across quiet/active spans.
///
/// A cycle opens on the first compression after the previous one closed.
/// Activity before that, such as a recoil-only dip from a resting baseline,
/// counts toward neither the active time nor the cycle span.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CycleTracker {
    started_at: Option<Millis>,
    active_ms: Millis,
    saw_compression: bool,
    saw_recoil: bool,
    quiet_since: Option<Millis>,
    last_ccf: f32,
    completed: u32,
}

impl CycleTracker {
    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.started_at.is_some()
    }

    /// Compression entry. Starts a fresh cycle when none is open.
    pub fn begin_compression(&mut self, now_ms: Millis) {
        if self.started_at.is_none() {
            self.started_at = Some(now_ms);
            self.active_ms = 0;
            self.saw_recoil = false;
        }
        self.saw_compression = true;
    }

    /// Ignored while no cycle is open.
    pub fn add_active(&mut self, duration_ms: Millis) {
        if self.started_at.is_some() {
            self.active_ms = self.active_ms.saturating_add(duration_ms);
        }
    }

    pub fn mark_recoil(&mut self) {
        self.saw_recoil = true;
    }

    pub fn enter_quiet(&mut self, now_ms: Millis) {
        self.quiet_since = Some(now_ms);
    }

    /// Runs once per quiet tick while a cycle is open. After the dwell elapses
    /// the cycle closes when it saw both phases; the flags are cleared either
    /// way. Returns the new CCF when a cycle closed.
    pub fn poll_quiet(&mut self, now_ms: Millis) -> Option<f32> {
        let started_at = self.started_at?;
        let quiet_since = self.quiet_since?;
        if elapsed_ms(now_ms, quiet_since) < CYCLE_QUIET_DWELL_MS {
            return None;
        }

        let mut closed = None;
        if self.saw_compression && self.saw_recoil {
            self.completed = self.completed.saturating_add(1);
            let total_ms = elapsed_ms(now_ms, started_at);
            if total_ms > 0 {
                self.last_ccf = (self.active_ms as f32 / total_ms as f32 * 100.0).min(100.0);
            }
            self.started_at = None;
            self.active_ms = 0;
            closed = Some(self.last_ccf);
        }

        self.saw_compression = false;
        self.saw_recoil = false;
        self.quiet_since = None;
        closed
    }

    pub fn ccf(&self) -> f32 {
        self.last_ccf
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }
}
