use crate::metrics::CompressionStateEngine;

/// Start/stop recording control with persistent session numbering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrainingSession {
    last_id: u32,
    current: Option<u32>,
}

impl TrainingSession {
    pub fn new(last_id: u32) -> Self {
        Self {
            last_id,
            current: None,
        }
    }

    /// Allocates the next session id and clears the engine. `None` while a
    /// session is already recording.
    pub fn start(&mut self, engine: &mut CompressionStateEngine) -> Option<u32> {
        if self.current.is_some() {
            return None;
        }
        let id = self.last_id.wrapping_add(1);
        self.last_id = id;
        self.current = Some(id);
        engine.reset();
        log::info!("session: start id={}", id);
        Some(id)
    }

    pub fn stop(&mut self) -> Option<u32> {
        let id = self.current.take()?;
        log::info!("session: stop id={}", id);
        Some(id)
    }

    pub fn is_recording(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_id(&self) -> Option<u32> {
        self.current
    }

    pub fn last_id(&self) -> u32 {
        self.last_id
    }
}
