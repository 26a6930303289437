//! Environmental sensor readings reported by the microcontroller.
//!
//! The board prints one CSV line per sample:
//! `temperature,humidity,gas_value,aqi,air_quality`.

use chrono::{DateTime, Local};

use crate::error::SensorError;

/// Number of comma-separated fields in a sensor line.
const SENSOR_FIELDS: usize = 5;

/// One snapshot from the environment sensors.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Raw gas sensor value.
    pub gas_value: f64,
    /// Air quality index.
    pub aqi: f64,
    /// Board-side air quality label, e.g. "Good".
    pub air_quality: String,
    /// When the line was parsed on the host.
    pub timestamp: DateTime<Local>,
}

impl SensorReading {
    /// Parses a sensor line, stamping it with `timestamp`.
    ///
    /// # Errors
    /// * `SensorError::NoData` - the line is blank.
    /// * `SensorError::Malformed` - wrong field count or a non-numeric value.
    pub fn parse_line(line: &str, timestamp: DateTime<Local>) -> Result<Self, SensorError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(SensorError::NoData);
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != SENSOR_FIELDS {
            return Err(SensorError::Malformed(line.to_string()));
        }
        let number = |raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| SensorError::Malformed(line.to_string()))
        };
        Ok(Self {
            temperature: number(fields[0])?,
            humidity: number(fields[1])?,
            gas_value: number(fields[2])?,
            aqi: number(fields[3])?,
            air_quality: fields[4].to_string(),
            timestamp,
        })
    }

    /// Text of the system message that hands this reading to the chat model.
    pub fn context_summary(&self) -> String {
        format!(
            "Current sensor readings: Temperature: {}°C, Humidity: {}%, AQI: {}, Air Quality: {}",
            self.temperature, self.humidity, self.aqi, self.air_quality
        )
    }
}
