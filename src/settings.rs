//! Flash record codec for the runtime threshold override and session counter.

use crate::metrics::Thresholds;

pub const SETTINGS_RECORD_LEN: usize = 52;
pub const SETTINGS_MAGIC: u32 = 0x4350_5254; // "CPRT"
pub const SETTINGS_VERSION: u8 = 1;

const WINDOW_OFFSET: usize = 5;
const TREND_OFFSET: usize = 6;
const BANDS_OFFSET: usize = 8;
const FLOATS_OFFSET: usize = 32;
const SESSION_OFFSET: usize = 44;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PersistedSettings {
    pub thresholds: Thresholds,
    pub last_session_id: u32,
}

impl PersistedSettings {
    pub fn record_bytes(self) -> [u8; SETTINGS_RECORD_LEN] {
        let t = self.thresholds;
        let mut record = [0xFFu8; SETTINGS_RECORD_LEN];
        record[0..4].copy_from_slice(&SETTINGS_MAGIC.to_le_bytes());
        record[4] = SETTINGS_VERSION;
        record[WINDOW_OFFSET] = t.smoothing_window;
        record[TREND_OFFSET] = t.trend_buffer_size;
        for (i, value) in [t.r1, t.r2, t.c1, t.c2, t.f1, t.f2].into_iter().enumerate() {
            let at = BANDS_OFFSET + i * 4;
            record[at..at + 4].copy_from_slice(&value.to_le_bytes());
        }
        for (i, value) in [
            t.quietude_percent,
            t.rate_smoothing_factor,
            t.hysteresis_margin,
        ]
        .into_iter()
        .enumerate()
        {
            let at = FLOATS_OFFSET + i * 4;
            record[at..at + 4].copy_from_slice(&value.to_bits().to_le_bytes());
        }
        record[SESSION_OFFSET..SESSION_OFFSET + 4]
            .copy_from_slice(&self.last_session_id.to_le_bytes());
        record[SETTINGS_RECORD_LEN - 1] = checksum8(&record[..SETTINGS_RECORD_LEN - 1]);
        record
    }

    /// `None` for an erased sector, a foreign or outdated record, a checksum
    /// mismatch, or thresholds that fail validation.
    pub fn from_record(record: &[u8; SETTINGS_RECORD_LEN]) -> Option<Self> {
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if read_u32(record, 0) != SETTINGS_MAGIC {
            return None;
        }
        if record[4] != SETTINGS_VERSION {
            return None;
        }
        let expected = checksum8(&record[..SETTINGS_RECORD_LEN - 1]);
        if expected != record[SETTINGS_RECORD_LEN - 1] {
            return None;
        }

        let band = |i: usize| read_u32(record, BANDS_OFFSET + i * 4) as i32;
        let float = |i: usize| f32::from_bits(read_u32(record, FLOATS_OFFSET + i * 4));
        let thresholds = Thresholds {
            r1: band(0),
            r2: band(1),
            c1: band(2),
            c2: band(3),
            f1: band(4),
            f2: band(5),
            quietude_percent: float(0),
            smoothing_window: record[WINDOW_OFFSET],
            rate_smoothing_factor: float(1),
            hysteresis_margin: float(2),
            trend_buffer_size: record[TREND_OFFSET],
        };
        thresholds.validate().ok()?;

        Some(Self {
            thresholds,
            last_session_id: read_u32(record, SESSION_OFFSET),
        })
    }
}

fn read_u32(record: &[u8; SETTINGS_RECORD_LEN], at: usize) -> u32 {
    u32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
}

pub fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reseal(record: &mut [u8; SETTINGS_RECORD_LEN]) {
        record[SETTINGS_RECORD_LEN - 1] = checksum8(&record[..SETTINGS_RECORD_LEN - 1]);
    }

    #[test]
    fn custom_settings_survive_encoding() {
        let settings = PersistedSettings {
            thresholds: Thresholds {
                r1: 150,
                c2: 950,
                f2: 130,
                hysteresis_margin: 0.02,
                trend_buffer_size: 5,
                ..Thresholds::default()
            },
            last_session_id: 1_234,
        };
        let record = settings.record_bytes();
        assert_eq!(PersistedSettings::from_record(&record), Some(settings));
    }

    #[test]
    fn erased_sector_is_empty() {
        assert_eq!(
            PersistedSettings::from_record(&[0xFF; SETTINGS_RECORD_LEN]),
            None
        );
    }

    #[test]
    fn rejects_unknown_version() {
        let mut record = PersistedSettings::default().record_bytes();
        record[4] = SETTINGS_VERSION + 1;
        reseal(&mut record);
        assert!(PersistedSettings::from_record(&record).is_none());
    }

    #[test]
    fn rejects_flipped_byte() {
        let mut record = PersistedSettings::default().record_bytes();
        record[BANDS_OFFSET] ^= 0x01;
        assert!(PersistedSettings::from_record(&record).is_none());
    }

    #[test]
    fn rejects_foreign_magic() {
        let mut record = PersistedSettings::default().record_bytes();
        record[0..4].copy_from_slice(&0x4D45_4449u32.to_le_bytes());
        reseal(&mut record);
        assert!(PersistedSettings::from_record(&record).is_none());
    }

    #[test]
    fn rejects_thresholds_that_fail_validation() {
        let mut record = PersistedSettings::default().record_bytes();
        record[WINDOW_OFFSET] = 0;
        reseal(&mut record);
        assert!(PersistedSettings::from_record(&record).is_none());
    }
}
