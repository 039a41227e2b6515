//! Level-triggered compression/recoil phase machine.
//!
//! One raw sample per tick goes in, a complete [`StatusSnapshot`] comes out.
//! Phase changes are decided by the slope/amplitude classifier on every tick;
//! the `statig` machine only keeps the current phase and routes the tick to
//! its handler.

use statig::blocking::IntoStateMachineExt as _;

mod hsm;

use hsm::PhaseHsm;

use super::{
    config::Thresholds,
    rate::RefreshFault,
    snapshot::StatusSnapshot,
    types::{Millis, Phase},
};

#[derive(Clone, Copy, Debug)]
enum PhaseEvent {
    Sample { raw: u16, now_ms: Millis },
}

#[derive(Default)]
struct DispatchContext {
    fault: Option<RefreshFault>,
}

pub struct CompressionStateEngine {
    machine: statig::blocking::StateMachine<PhaseHsm>,
}

impl Default for CompressionStateEngine {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl CompressionStateEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            machine: PhaseHsm::new(thresholds).state_machine(),
        }
    }

    #[cfg(test)]
    fn from_hsm(hsm: PhaseHsm) -> Self {
        Self {
            machine: hsm.state_machine(),
        }
    }

    /// Installs a complete threshold record and resets all derived state.
    /// Values are taken as given; see [`Thresholds::validate`].
    pub fn configure(&mut self, thresholds: Thresholds) {
        log::info!(
            "cpr: configure r1={} r2={} c1={} c2={} f1={} f2={}",
            thresholds.r1,
            thresholds.r2,
            thresholds.c1,
            thresholds.c2,
            thresholds.f1,
            thresholds.f2
        );
        self.machine = PhaseHsm::new(thresholds).state_machine();
    }

    pub fn reset(&mut self) {
        let thresholds = self.thresholds();
        self.machine = PhaseHsm::new(thresholds).state_machine();
        log::info!("cpr: reset");
    }

    pub fn thresholds(&self) -> Thresholds {
        self.machine.inner().thresholds()
    }

    pub fn phase(&self) -> Phase {
        self.machine.inner().phase()
    }

    pub fn snapshot(&self, now_ms: Millis) -> StatusSnapshot {
        self.machine.inner().snapshot(now_ms)
    }

    pub fn process_sample(&mut self, raw: u16, now_ms: Millis) -> StatusSnapshot {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&PhaseEvent::Sample { raw, now_ms }, &mut context);

        if let Some(fault) = context.fault {
            let thresholds = self.thresholds();
            log::warn!(
                "cpr: refresh_fault kind={} now_ms={} action=reset",
                fault.label(),
                now_ms
            );
            self.machine = PhaseHsm::after_fault(thresholds, now_ms).state_machine();
        }

        self.snapshot(now_ms)
    }
}

#[cfg(test)]
mod tests;
