use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    REWARD_MULTIPLIER_COMMUNITY, REWARD_MULTIPLIER_HUMAN, REWARD_MULTIPLIER_IOT,
    REWARD_MULTIPLIER_SATELLITE,
};
use crate::error::DmeterError;

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Reward amount in whole DMT tokens.
pub type TokenAmount = u64;

// ── SourceKind ───────────────────────────────────────────────────────────────

/// Category of data origin. Drives which verification attestations are
/// attached and which reward multiplier applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Satellite,
    Iot,
    Human,
    Community,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Satellite,
        SourceKind::Iot,
        SourceKind::Human,
        SourceKind::Community,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Satellite => "satellite",
            SourceKind::Iot => "iot",
            SourceKind::Human => "human",
            SourceKind::Community => "community",
        }
    }

    /// Reward multiplier for data originating from this kind of source.
    pub fn reward_multiplier(&self) -> f64 {
        match self {
            SourceKind::Satellite => REWARD_MULTIPLIER_SATELLITE,
            SourceKind::Iot => REWARD_MULTIPLIER_IOT,
            SourceKind::Human => REWARD_MULTIPLIER_HUMAN,
            SourceKind::Community => REWARD_MULTIPLIER_COMMUNITY,
        }
    }

    /// Prefix of the verification proof string for this kind.
    pub fn proof_prefix(&self) -> &'static str {
        match self {
            SourceKind::Satellite => "sat",
            SourceKind::Iot => "iot",
            SourceKind::Human => "hum",
            SourceKind::Community => "com",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = DmeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "satellite" => Ok(SourceKind::Satellite),
            "iot" => Ok(SourceKind::Iot),
            "human" => Ok(SourceKind::Human),
            "community" => Ok(SourceKind::Community),
            other => Err(DmeterError::UnknownSourceKind(other.to_string())),
        }
    }
}

// ── DataType ─────────────────────────────────────────────────────────────────

/// Known environmental measurement types.
///
/// Submissions carry the data type as a free-form display name; names outside
/// this table are accepted but earn no base reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Temperature,
    Humidity,
    AirQuality,
    WaterQuality,
    SoilQuality,
    NoiseLevel,
    LightLevel,
    Pressure,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Temperature,
        DataType::Humidity,
        DataType::AirQuality,
        DataType::WaterQuality,
        DataType::SoilQuality,
        DataType::NoiseLevel,
        DataType::LightLevel,
        DataType::Pressure,
    ];

    /// Display name, as entered on the submission form.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Temperature => "Temperature",
            DataType::Humidity => "Humidity",
            DataType::AirQuality => "Air Quality",
            DataType::WaterQuality => "Water Quality",
            DataType::SoilQuality => "Soil Quality",
            DataType::NoiseLevel => "Noise Level",
            DataType::LightLevel => "Light Level",
            DataType::Pressure => "Pressure",
        }
    }

    /// Default measurement unit.
    pub fn unit(&self) -> &'static str {
        match self {
            DataType::Temperature => "°C",
            DataType::Humidity => "%",
            DataType::AirQuality => "AQI",
            DataType::WaterQuality | DataType::SoilQuality => "pH",
            DataType::NoiseLevel => "dB",
            DataType::LightLevel => "lux",
            DataType::Pressure => "hPa",
        }
    }

    /// Base reward (DMT) per accepted submission.
    pub fn reward_rate(&self) -> TokenAmount {
        match self {
            DataType::AirQuality => 15,
            DataType::WaterQuality | DataType::SoilQuality => 20,
            _ => 10,
        }
    }

    /// Look up a data type by display name. Exact match, as the rate table
    /// is keyed by the form's option labels.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── SubmissionId ─────────────────────────────────────────────────────────────

/// 32-byte submission identifier: BLAKE3 of the canonical submission bytes
/// plus the verification timestamp.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub [u8; 32]);

impl SubmissionId {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, DmeterError> {
        let bytes = hex::decode(s)
            .map_err(|e| DmeterError::invalid("id", format!("is not hex: {e}")))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DmeterError::invalid("id", "must be 32 bytes"))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubmissionId({}…)", &self.to_hex()[..16])
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Clamp a probability-like value into [0, 1]. NaN collapses to 0.
pub fn unit_interval(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Floor a scaling factor at 0. Non-finite values collapse to 0.
pub fn non_negative(x: f64) -> f64 {
    if !x.is_finite() || x < 0.0 {
        0.0
    } else {
        x
    }
}

/// `num / den`, or 0 when the denominator is zero (or the result is not finite).
pub fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let r = num / den;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_lookup_by_display_name() {
        assert_eq!(DataType::from_name("Air Quality"), Some(DataType::AirQuality));
        assert_eq!(DataType::from_name("air quality"), None);
        assert_eq!(DataType::from_name("Radiation"), None);
        assert_eq!(DataType::WaterQuality.reward_rate(), 20);
        assert_eq!(DataType::Pressure.unit(), "hPa");
    }

    #[test]
    fn source_kind_parses_case_insensitively() {
        assert_eq!("IoT".parse::<SourceKind>().unwrap(), SourceKind::Iot);
        assert!("drone".parse::<SourceKind>().is_err());
        assert_eq!(SourceKind::Community.reward_multiplier(), 1.3);
    }

    #[test]
    fn submission_id_hex_roundtrip_rejects_short_input() {
        let id = SubmissionId::from_bytes([0xAB; 32]);
        assert_eq!(SubmissionId::from_hex(&id.to_hex()).unwrap(), id);
        assert!(SubmissionId::from_hex("abcd").is_err());
    }

    #[test]
    fn guards() {
        assert_eq!(unit_interval(f64::NAN), 0.0);
        assert_eq!(unit_interval(1.7), 1.0);
        assert_eq!(unit_interval(-0.2), 0.0);
        assert_eq!(ratio_or_zero(5.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(3.0, 4.0), 0.75);
        assert_eq!(non_negative(-1.0), 0.0);
        assert_eq!(non_negative(f64::INFINITY), 0.0);
        assert_eq!(non_negative(2.5), 2.5);
    }
}
