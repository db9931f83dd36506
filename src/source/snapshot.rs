//! Wire types for telemetry batches.
//!
//! These types match the records emitted by the Sentinel-V sensor engine.
//! The engine writes one row per asset per tick; the monitor consumes the
//! whole set as a [`SnapshotBatch`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::SourceError;

/// One reading for one asset at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Asset identifier, unique within a batch.
    pub device_name: String,

    /// Smoothed vibration magnitude in Gs. This is the scalar the
    /// dashboard trends and the primary classifier feature.
    #[serde(alias = "smooth_mag")]
    pub magnitude: f64,

    /// Raw (unsmoothed) vibration frequency in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_freq: Option<f64>,

    /// Smoothed vibration frequency in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smooth_freq: Option<f64>,

    /// Raw (unsmoothed) vibration magnitude in Gs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_mag: Option<f64>,

    /// Binary classifier verdict: `0` nominal, `1` anomalous.
    ///
    /// Absent until the classifier has scored the record. Write-once: the
    /// classifier fills it, nothing mutates it afterward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,
}

impl DeviceSnapshot {
    /// Create a record carrying only the required fields.
    pub fn new(device_name: impl Into<String>, magnitude: f64) -> Self {
        Self {
            device_name: device_name.into(),
            magnitude,
            raw_freq: None,
            smooth_freq: None,
            raw_mag: None,
            prediction: None,
        }
    }
}

/// The full set of device readings for one tick.
///
/// Device names are unique within a batch; producer-emitted order is
/// preserved so the display stays stable across ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotBatch {
    records: Vec<DeviceSnapshot>,
}

impl SnapshotBatch {
    /// Build a batch from records whose device names are already unique.
    pub fn from_records(records: Vec<DeviceSnapshot>) -> Self {
        Self { records }
    }

    /// Parse a batch from raw telemetry content.
    ///
    /// Accepts the engine's CSV format or a JSON array of records, chosen
    /// by sniffing the leading character. Blank content is the "no data
    /// yet" case and parses to an empty batch rather than an error.
    pub fn parse(content: &str) -> Result<Self, SourceError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            Self::parse_json(trimmed)
        } else {
            Self::parse_csv(trimmed)
        }
    }

    fn parse_json(content: &str) -> Result<Self, SourceError> {
        let records: Vec<DeviceSnapshot> =
            serde_json::from_str(content).map_err(|e| SourceError::Malformed(e.to_string()))?;
        check_unique(&records)?;
        Ok(Self { records })
    }

    /// Parse the engine's CSV: a header row naming the columns, then one
    /// row per asset. Column positions are taken from the header, so the
    /// engine is free to add or reorder columns.
    fn parse_csv(content: &str) -> Result<Self, SourceError> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| SourceError::Malformed("empty csv content".into()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let position = |name: &str| columns.iter().position(|c| *c == name);

        let device_col = position("device_name")
            .ok_or_else(|| SourceError::Malformed("missing device_name column".into()))?;
        let mag_col = position("smooth_mag")
            .ok_or_else(|| SourceError::Malformed("missing smooth_mag column".into()))?;
        let raw_freq_col = position("raw_freq");
        let smooth_freq_col = position("smooth_freq");
        let raw_mag_col = position("raw_mag");

        let mut records = Vec::new();
        for line in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(SourceError::Malformed(format!(
                    "row has {} fields, header names {} columns",
                    fields.len(),
                    columns.len()
                )));
            }

            let float = |col: usize| -> Result<f64, SourceError> {
                fields[col].parse::<f64>().map_err(|_| {
                    SourceError::Malformed(format!(
                        "bad value {:?} in column {:?}",
                        fields[col], columns[col]
                    ))
                })
            };

            records.push(DeviceSnapshot {
                device_name: fields[device_col].to_string(),
                magnitude: float(mag_col)?,
                raw_freq: raw_freq_col.map(&float).transpose()?,
                smooth_freq: smooth_freq_col.map(&float).transpose()?,
                raw_mag: raw_mag_col.map(&float).transpose()?,
                prediction: None,
            });
        }

        check_unique(&records)?;
        Ok(Self { records })
    }

    /// Look up the record for a device.
    pub fn get(&self, device_name: &str) -> Option<&DeviceSnapshot> {
        self.records.iter().find(|r| r.device_name == device_name)
    }

    /// Iterate records in producer-emitted order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceSnapshot> {
        self.records.iter()
    }

    /// Device names in producer-emitted order.
    pub fn device_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.device_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// An empty batch means the producer has not emitted data yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn check_unique(records: &[DeviceSnapshot]) -> Result<(), SourceError> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.device_name.as_str()) {
            return Err(SourceError::Malformed(format!(
                "duplicate device {:?} in batch",
                record.device_name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_csv() -> &'static str {
        "device_name,timestamp,raw_freq,smooth_freq,raw_mag,smooth_mag,isDanger\n\
         Main_Motor_A,0,120.5,118.2,0.50,0.42,0\n\
         Cooling_Fan_01,0,380.1,361.9,6.10,5.72,1\n"
    }

    #[test]
    fn test_parse_engine_csv() {
        let batch = SnapshotBatch::parse(sample_csv()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.device_names(), vec!["Main_Motor_A", "Cooling_Fan_01"]);

        let motor = batch.get("Main_Motor_A").unwrap();
        assert_eq!(motor.magnitude, 0.42);
        assert_eq!(motor.smooth_freq, Some(118.2));
        assert_eq!(motor.prediction, None);
    }

    #[test]
    fn test_parse_json_array() {
        let json = r#"[
            {"device_name": "Main_Motor_A", "smooth_mag": 0.42, "smooth_freq": 118.2},
            {"device_name": "Main_Motor_B", "magnitude": 3.91}
        ]"#;
        let batch = SnapshotBatch::parse(json).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get("Main_Motor_A").unwrap().magnitude, 0.42);
        assert_eq!(batch.get("Main_Motor_B").unwrap().magnitude, 3.91);
    }

    #[test]
    fn test_parse_blank_content_is_empty_batch() {
        assert!(SnapshotBatch::parse("").unwrap().is_empty());
        assert!(SnapshotBatch::parse("  \n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_columns() {
        let err = SnapshotBatch::parse("device_name,timestamp\nMain_Motor_A,0\n").unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
        assert!(err.to_string().contains("smooth_mag"));
    }

    #[test]
    fn test_parse_rejects_torn_row() {
        // A row cut off mid-write has fewer fields than the header
        let torn = "device_name,smooth_mag\nMain_Motor_A,0.42\nCooling_Fan_01\n";
        assert!(matches!(
            SnapshotBatch::parse(torn),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_float() {
        let bad = "device_name,smooth_mag\nMain_Motor_A,not-a-number\n";
        assert!(matches!(
            SnapshotBatch::parse(bad),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_duplicate_device() {
        let dup = "device_name,smooth_mag\nMain_Motor_A,0.42\nMain_Motor_A,0.43\n";
        let err = SnapshotBatch::parse(dup).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_csv_column_order_is_taken_from_header() {
        let reordered = "smooth_mag,device_name\n1.5,Hydraulic_Pump_02\n";
        let batch = SnapshotBatch::parse(reordered).unwrap();
        assert_eq!(batch.get("Hydraulic_Pump_02").unwrap().magnitude, 1.5);
    }
}
