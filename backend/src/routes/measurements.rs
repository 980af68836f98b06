use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Measurement, MeasurementId};

/// Request body for recording a measurement.
///
/// Both fields are optional at the wire level so that a missing field is
/// reported by the validation guard with a field-specific message instead of a
/// generic deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasurementRequest {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Wire representation of a stored measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResponse {
    pub id: MeasurementId,
    pub temperature: f64,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Measurement> for MeasurementResponse {
    fn from(measurement: &Measurement) -> Self {
        Self {
            id: measurement.id,
            temperature: measurement.temperature,
            device_id: measurement.device_id.clone(),
            created_at: measurement.created_at,
        }
    }
}

/// Query parameters for the measurement listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMeasurementsQuery {
    /// Maximum number of measurements to return (newest first)
    #[serde(default)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case_fields() {
        let request: CreateMeasurementRequest =
            serde_json::from_value(json!({"temperature": 21.5, "deviceId": "sensor-1"})).unwrap();
        assert_eq!(request.temperature, Some(21.5));
        assert_eq!(request.device_id.as_deref(), Some("sensor-1"));
    }

    #[test]
    fn test_request_missing_fields_are_none() {
        let request: CreateMeasurementRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.temperature.is_none());
        assert!(request.device_id.is_none());

        let request: CreateMeasurementRequest =
            serde_json::from_value(json!({"temperature": null, "deviceId": null})).unwrap();
        assert!(request.temperature.is_none());
        assert!(request.device_id.is_none());
    }

    #[test]
    fn test_request_rejects_non_numeric_temperature() {
        let result: Result<CreateMeasurementRequest, _> =
            serde_json::from_value(json!({"temperature": "warm", "deviceId": "sensor-1"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_serializes_wire_field_names() {
        let measurement = Measurement {
            id: MeasurementId::generate(),
            temperature: 18.25,
            device_id: "boiler-7".to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(MeasurementResponse::from(&measurement)).unwrap();

        assert_eq!(value["id"], json!(measurement.id.to_string()));
        assert_eq!(value["temperature"], json!(18.25));
        assert_eq!(value["deviceId"], json!("boiler-7"));
        assert!(value["createdAt"].is_string());
        assert_eq!(value.as_object().unwrap().len(), 4);
    }
}
