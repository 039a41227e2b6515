use crate::metrics::config::SENSOR_MAX;

/// Full scale of the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Maps a 12-bit ADC reading onto the 10-bit force domain the thresholds
/// are expressed in. Readings above full scale saturate.
pub fn scale_to_sensor_domain(raw: u16) -> u16 {
    let raw = u32::from(raw.min(ADC_MAX));
    (raw * u32::from(SENSOR_MAX) / u32::from(ADC_MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_onto_endpoints() {
        assert_eq!(scale_to_sensor_domain(0), 0);
        assert_eq!(scale_to_sensor_domain(ADC_MAX), SENSOR_MAX);
        assert_eq!(scale_to_sensor_domain(u16::MAX), SENSOR_MAX);
    }

    #[test]
    fn midscale_truncates() {
        assert_eq!(scale_to_sensor_domain(2048), 511);
        assert_eq!(scale_to_sensor_domain(2800), 699);
    }
}
