use serde::{Deserialize, Serialize};

/// One reading from the field hardware node.
///
/// The field names and nullability are the integration contract that
/// devices post against; do not rename them. Detection flags arrive as
/// 0/1 integers rather than booleans because the firmware emits raw GPIO
/// levels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HardwareReading {
    pub accel_x: Option<f64>,
    pub accel_y: Option<f64>,
    pub accel_z: Option<f64>,
    pub gyro_x: Option<f64>,
    pub gyro_y: Option<f64>,
    pub gyro_z: Option<f64>,
    pub temperature_bme: Option<f64>,
    pub temperature_mpu: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub altitude: Option<f64>,
    pub rain_detected: Option<u8>,
    pub soil_moisture_wet: Option<u8>,
    pub vibration_detected: Option<u8>,
    /// ISO-8601; filled in by the server when the device omits it.
    pub timestamp: Option<String>,
}

impl HardwareReading {
    /// Treats a missing flag as "not detected".
    #[must_use]
    pub fn flag(value: Option<u8>) -> bool {
        matches!(value, Some(v) if v != 0)
    }

    /// Number of populated fields, used as a confidence proxy.
    #[must_use]
    pub fn populated_fields(&self) -> usize {
        [
            self.accel_x.is_some(),
            self.accel_y.is_some(),
            self.accel_z.is_some(),
            self.gyro_x.is_some(),
            self.gyro_y.is_some(),
            self.gyro_z.is_some(),
            self.temperature_bme.is_some(),
            self.temperature_mpu.is_some(),
            self.humidity.is_some(),
            self.pressure.is_some(),
            self.altitude.is_some(),
            self.rain_detected.is_some(),
            self.soil_moisture_wet.is_some(),
            self.vibration_detected.is_some(),
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }
}

/// Response of `GET /api/sensors/latest`.
///
/// `connected` is true only when a reading arrived within the last 30
/// seconds; otherwise `reading` is a synthesized placeholder so consumers
/// never render a hard failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SensorsLatestResponse {
    pub connected: bool,
    pub reading: HardwareReading,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_optional() {
        let reading: HardwareReading = serde_json::from_str("{}").unwrap();
        assert_eq!(reading, HardwareReading::default());
        assert_eq!(reading.populated_fields(), 0);
    }

    #[test]
    fn test_contract_field_names() {
        let json = serde_json::to_value(HardwareReading::default()).unwrap();
        for key in [
            "accel_x",
            "gyro_z",
            "temperature_bme",
            "temperature_mpu",
            "humidity",
            "pressure",
            "altitude",
            "rain_detected",
            "soil_moisture_wet",
            "vibration_detected",
            "timestamp",
        ] {
            assert!(json.get(key).is_some(), "missing contract field {key}");
        }
    }

    #[test]
    fn test_flag_parsing() {
        assert!(HardwareReading::flag(Some(1)));
        assert!(!HardwareReading::flag(Some(0)));
        assert!(!HardwareReading::flag(None));
    }
}
