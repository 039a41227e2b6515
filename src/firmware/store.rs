use cpr_trainer::settings::{PersistedSettings, SETTINGS_RECORD_LEN};
use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;

/// Settings record kept in the last flash sector.
pub(crate) struct SettingsStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
}

impl<'d> SettingsStore<'d> {
    pub(crate) fn new(flash_peripheral: esp_hal::peripherals::FLASH<'d>) -> Self {
        let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
        Self { flash, offset }
    }

    pub(crate) fn load(&mut self) -> Option<PersistedSettings> {
        let mut record = [0u8; SETTINGS_RECORD_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        PersistedSettings::from_record(&record)
    }

    pub(crate) fn save(&mut self, settings: PersistedSettings) {
        if self.load() == Some(settings) {
            return;
        }
        let record = settings.record_bytes();
        match self.flash.write(self.offset, &record) {
            Ok(()) => log::info!(
                "store: saved offset={:#x} last_session={}",
                self.offset,
                settings.last_session_id
            ),
            Err(_) => log::warn!("store: write failed offset={:#x}", self.offset),
        }
    }
}
