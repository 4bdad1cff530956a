//! Modelo de MileageObservation
//!
//! Lecturas manuales de odómetro. Son append-only: nunca se editan después
//! de creadas para preservar la integridad del historial.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lectura de odómetro reportada para un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MileageObservation {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    /// Valor del odómetro (km)
    pub value: i64,
    /// Timestamp auto-asignado al crear la observación
    pub recorded_at: DateTime<Utc>,
}

impl MileageObservation {
    /// Fecha calendario de la observación
    pub fn recorded_date(&self) -> NaiveDate {
        self.recorded_at.date_naive()
    }
}

/// Request para reportar una lectura de odómetro
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMileageObservationRequest {
    pub vehicle_id: Uuid,

    #[validate(range(min = 0))]
    pub value: i64,
}
