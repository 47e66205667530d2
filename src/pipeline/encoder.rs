//! Label codec between severity names and classifier label codes
//!
//! The encoder fitted at training time is the only one valid for
//! decoding that training's predictions; it is persisted inside the
//! model snapshot and never re-derived at serving time.

use serde::{Deserialize, Serialize};

use crate::models::Severity;
use crate::pipeline::PipelineError;

/// Bijection between observed severity names and integer codes.
///
/// Codes are assigned by lexicographic order of the category name, so
/// two encoders fitted on the same vocabulary are identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I: IntoIterator<Item = Severity>>(statuses: I) -> Self {
        let mut classes: Vec<String> = statuses
            .into_iter()
            .map(|s| s.as_str().to_string())
            .collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn encode(&self, status: Severity) -> Result<usize, PipelineError> {
        self.classes
            .iter()
            .position(|c| c == status.as_str())
            .ok_or_else(|| PipelineError::UnknownLabel(status.as_str().to_string()))
    }

    pub fn decode(&self, code: usize) -> Result<Severity, PipelineError> {
        let name = self.classes.get(code).ok_or(PipelineError::UnknownCode {
            code,
            n_classes: self.classes.len(),
        })?;
        Severity::from_name(name).ok_or_else(|| PipelineError::UnknownLabel(name.clone()))
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_assigns_lexicographic_codes() {
        let encoder = LabelEncoder::fit(Severity::all());
        // emergence < epidemic < neither < pandemic
        assert_eq!(encoder.encode(Severity::Emergence).unwrap(), 0);
        assert_eq!(encoder.encode(Severity::Epidemic).unwrap(), 1);
        assert_eq!(encoder.encode(Severity::Neither).unwrap(), 2);
        assert_eq!(encoder.encode(Severity::Pandemic).unwrap(), 3);
    }

    #[test]
    fn test_round_trip_over_fitted_vocabulary() {
        let encoder = LabelEncoder::fit([Severity::Emergence, Severity::Pandemic]);
        for status in [Severity::Emergence, Severity::Pandemic] {
            let code = encoder.encode(status).unwrap();
            assert_eq!(encoder.decode(code).unwrap(), status);
        }
    }

    #[test]
    fn test_encode_fails_outside_vocabulary() {
        let encoder = LabelEncoder::fit([Severity::Emergence, Severity::Epidemic]);
        assert!(matches!(
            encoder.encode(Severity::Pandemic),
            Err(PipelineError::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_decode_fails_out_of_range() {
        let encoder = LabelEncoder::fit([Severity::Emergence, Severity::Epidemic]);
        assert!(matches!(
            encoder.decode(2),
            Err(PipelineError::UnknownCode { code: 2, n_classes: 2 })
        ));
    }

    #[test]
    fn test_duplicate_observations_collapse() {
        let encoder = LabelEncoder::fit([
            Severity::Epidemic,
            Severity::Epidemic,
            Severity::Neither,
        ]);
        assert_eq!(encoder.n_classes(), 2);
    }
}
