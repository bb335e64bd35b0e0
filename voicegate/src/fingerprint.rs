use std::fmt;

use serde::{Deserialize, Serialize};

use crate::VoicegateError;

/// Compact numeric summary of one spoken utterance.
///
/// A fingerprint is immutable once created: re-enrollment replaces it,
/// it is never updated in place. The serialized record uses the field
/// names `activeSampleCount`, `averageVolume`, `peakVolume`,
/// `rhythmScore` and `peakCount`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    /// Number of samples louder than the silence floor.
    #[serde(alias = "duration")]
    pub active_sample_count: u32,

    /// Mean volume over active samples, in `[0, 1]`.
    #[serde(alias = "avgVolume")]
    pub average_volume: f64,

    /// Maximum volume over active samples, in `[0, 1]`.
    #[serde(alias = "maxVolume")]
    pub peak_volume: f64,

    /// Mean absolute volume change between consecutive active samples.
    #[serde(alias = "rhythm")]
    pub rhythm_score: f64,

    /// Strict local maxima among active samples above the peak threshold.
    #[serde(alias = "peaks")]
    pub peak_count: u32,
}

impl Fingerprint {
    /// Checks that the record could have been produced by extraction.
    pub fn validate(&self) -> Result<(), VoicegateError> {
        let reals = [
            ("averageVolume", self.average_volume),
            ("peakVolume", self.peak_volume),
            ("rhythmScore", self.rhythm_score),
        ];
        for (name, v) in reals {
            if !v.is_finite() {
                return Err(VoicegateError::InvalidFingerprint(format!(
                    "{name} is not finite"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.average_volume) {
            return Err(VoicegateError::InvalidFingerprint(format!(
                "averageVolume {} outside [0, 1]",
                self.average_volume
            )));
        }
        if !(0.0..=1.0).contains(&self.peak_volume) {
            return Err(VoicegateError::InvalidFingerprint(format!(
                "peakVolume {} outside [0, 1]",
                self.peak_volume
            )));
        }
        if self.rhythm_score < 0.0 {
            return Err(VoicegateError::InvalidFingerprint(format!(
                "rhythmScore {} is negative",
                self.rhythm_score
            )));
        }
        if self.peak_volume < self.average_volume {
            return Err(VoicegateError::InvalidFingerprint(format!(
                "peakVolume {} below averageVolume {}",
                self.peak_volume, self.average_volume
            )));
        }
        Ok(())
    }

    /// Encodes the fingerprint as a JSON record.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decodes a JSON record. Records written with the legacy keys
    /// (`duration`, `avgVolume`, `maxVolume`, `rhythm`, `peaks`) are accepted.
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "active={} avg={:.4} peak={:.4} rhythm={:.4} peaks={}",
            self.active_sample_count,
            self.average_volume,
            self.peak_volume,
            self.rhythm_score,
            self.peak_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fingerprint() -> Fingerprint {
        Fingerprint {
            active_sample_count: 50,
            average_volume: 0.12,
            peak_volume: 0.31,
            rhythm_score: 0.03,
            peak_count: 6,
        }
    }

    #[test]
    fn json_field_names() {
        let json: serde_json::Value =
            serde_json::from_slice(&sample_fingerprint().to_json().unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "activeSampleCount",
                "averageVolume",
                "peakCount",
                "peakVolume",
                "rhythmScore"
            ]
        );
        assert_eq!(json["activeSampleCount"], 50);
        assert_eq!(json["peakCount"], 6);
    }

    #[test]
    fn json_roundtrip_is_exact() {
        let fp = Fingerprint {
            active_sample_count: 123,
            average_volume: 0.1 + 0.2,
            peak_volume: 0.987_654_321,
            rhythm_score: 1.0 / 3.0,
            peak_count: 9,
        };
        let back = Fingerprint::from_json(&fp.to_json().unwrap()).unwrap();
        assert_eq!(back, fp);
    }

    #[test]
    fn legacy_record() {
        let data = br#"{"duration":42,"avgVolume":0.08,"maxVolume":0.4,"rhythm":0.02,"peaks":3}"#;
        let fp = Fingerprint::from_json(data).unwrap();
        assert_eq!(fp.active_sample_count, 42);
        assert_eq!(fp.average_volume, 0.08);
        assert_eq!(fp.peak_volume, 0.4);
        assert_eq!(fp.rhythm_score, 0.02);
        assert_eq!(fp.peak_count, 3);
    }

    #[test]
    fn missing_field_rejected() {
        let data = br#"{"activeSampleCount":42,"averageVolume":0.08}"#;
        assert!(Fingerprint::from_json(data).is_err());
    }

    #[test]
    fn validate_accepts_extracted_shape() {
        assert!(sample_fingerprint().validate().is_ok());

        let zero = Fingerprint {
            active_sample_count: 0,
            average_volume: 0.0,
            peak_volume: 0.0,
            rhythm_score: 0.0,
            peak_count: 0,
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_records() {
        let mut fp = sample_fingerprint();
        fp.average_volume = f64::NAN;
        assert!(fp.validate().is_err());

        let mut fp = sample_fingerprint();
        fp.peak_volume = 1.5;
        assert!(fp.validate().is_err());

        let mut fp = sample_fingerprint();
        fp.rhythm_score = -0.1;
        assert!(fp.validate().is_err());

        let mut fp = sample_fingerprint();
        fp.peak_volume = 0.05;
        let err = fp.validate().unwrap_err();
        assert!(err.to_string().contains("below averageVolume"), "got {err}");
    }

    #[test]
    fn display() {
        assert_eq!(
            sample_fingerprint().to_string(),
            "active=50 avg=0.1200 peak=0.3100 rhythm=0.0300 peaks=6"
        );
    }
}
