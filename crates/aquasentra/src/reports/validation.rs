use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{ReportDetails, Severity};

const ADDRESS_MAX_CHARS: usize = 500;
const HAZARD_TYPE_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Raw report payload as submitted by a client.
///
/// Fields are kept as raw JSON so that missing or mistyped values surface as
/// field errors instead of a generic body rejection. Coordinates may be sent as
/// numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub hazard_type: Option<Value>,
    #[serde(default)]
    pub severity: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All field failures found in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation failed for {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.field)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ReportSubmission {
    /// Check ranges, lengths, and enums, returning trimmed report details.
    pub fn validate(self) -> Result<ReportDetails, ValidationError> {
        let mut errors = Vec::new();

        let latitude = coordinate(self.latitude.as_ref(), -90.0, 90.0);
        if latitude.is_none() {
            errors.push(FieldError {
                field: "latitude",
                message: "Latitude must be a number between -90 and 90",
            });
        }

        let longitude = coordinate(self.longitude.as_ref(), -180.0, 180.0);
        if longitude.is_none() {
            errors.push(FieldError {
                field: "longitude",
                message: "Longitude must be a number between -180 and 180",
            });
        }

        let address = bounded_text(text(self.address.as_ref()), ADDRESS_MAX_CHARS);
        if address.is_none() {
            errors.push(FieldError {
                field: "address",
                message: "Address must be between 1 and 500 characters",
            });
        }

        let hazard_type = bounded_text(text(self.hazard_type.as_ref()), HAZARD_TYPE_MAX_CHARS);
        if hazard_type.is_none() {
            errors.push(FieldError {
                field: "hazardType",
                message: "Hazard type must be between 1 and 100 characters",
            });
        }

        let severity =
            text(self.severity.as_ref()).and_then(|value| value.parse::<Severity>().ok());
        if severity.is_none() {
            errors.push(FieldError {
                field: "severity",
                message: "Severity must be either \"low\", \"medium\", or \"high\"",
            });
        }

        let (description, description_ok) = match self.description.as_ref() {
            None => (None, true),
            Some(Value::String(raw)) => {
                let trimmed = raw.trim();
                (
                    Some(trimmed).filter(|text| !text.is_empty()),
                    trimmed.chars().count() <= DESCRIPTION_MAX_CHARS,
                )
            }
            Some(_) => (None, false),
        };
        if !description_ok {
            errors.push(FieldError {
                field: "description",
                message: "Description cannot exceed 1000 characters",
            });
        }

        match (latitude, longitude, address, hazard_type, severity) {
            (Some(latitude), Some(longitude), Some(address), Some(hazard_type), Some(severity))
                if errors.is_empty() =>
            {
                Ok(ReportDetails {
                    latitude,
                    longitude,
                    address,
                    hazard_type,
                    severity,
                    description: description.map(str::to_string),
                })
            }
            _ => Err(ValidationError { errors }),
        }
    }
}

fn coordinate(value: Option<&Value>, min: f64, max: f64) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(raw) => raw.parse::<f64>().ok()?,
        _ => return None,
    };
    Some(number).filter(|number| number.is_finite() && (min..=max).contains(number))
}

fn text(value: Option<&Value>) -> Option<&str> {
    value?.as_str()
}

fn bounded_text(value: Option<&str>, max_chars: usize) -> Option<String> {
    let trimmed = value?.trim();
    let length = trimmed.chars().count();
    if length == 0 || length > max_chars {
        None
    } else {
        Some(trimmed.to_string())
    }
}
