use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::measurements;
use crate::models::{Measurement, MeasurementId, NewMeasurement};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = measurements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MeasurementRow {
    pub id: Uuid,
    pub temperature: f64,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable row. `id` and `created_at` come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = measurements)]
pub struct NewMeasurementRow {
    pub temperature: f64,
    pub device_id: String,
}

impl From<MeasurementRow> for Measurement {
    fn from(row: MeasurementRow) -> Self {
        Self {
            id: MeasurementId::new(row.id),
            temperature: row.temperature,
            device_id: row.device_id,
            created_at: row.created_at,
        }
    }
}

impl From<&NewMeasurement> for NewMeasurementRow {
    fn from(measurement: &NewMeasurement) -> Self {
        Self {
            temperature: measurement.temperature,
            device_id: measurement.device_id.clone(),
        }
    }
}
