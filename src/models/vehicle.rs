//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD
//! operations. Los cuatro campos `average_daily_mileage`, `last_service_*`
//! y `next_service_*` son caché derivada: el motor de predicción los
//! reescribe cada vez que llega una observación nueva.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub make: String,
    pub model: String,
    /// Kilometraje actual del odómetro (km). Monótono no-decreciente.
    pub mileage: i64,
    /// Kilometraje con el que el vehículo entró al sistema. Inmutable
    /// después del alta salvo por un actor privilegiado.
    pub initial_mileage: i64,
    pub created_at: DateTime<Utc>,
    // Caché de predicción
    pub average_daily_mileage: Option<f64>,
    pub last_service_date: Option<NaiveDate>,
    pub last_service_mileage: Option<i64>,
    pub next_service_date: Option<NaiveDate>,
    pub next_service_mileage: Option<i64>,
}

impl Vehicle {
    /// Fecha calendario del alta del vehículo
    pub fn created_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Días transcurridos desde el alta (nunca negativo)
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.created_date()).num_days().max(0)
    }

    /// Kilometraje acumulado desde el alta
    pub fn accumulated_mileage(&self) -> i64 {
        self.mileage - self.initial_mileage
    }
}

/// Request para registrar un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 5, max = 20))]
    pub license_plate: String,

    #[validate(length(min = 2, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 0))]
    pub initial_mileage: i64,
}

/// Response de vehículo con su predicción vigente
#[derive(Debug, Serialize)]
pub struct VehiclePredictionResponse {
    pub id: String,
    pub license_plate: String,
    pub mileage: i64,
    pub average_daily_mileage: Option<f64>,
    pub next_service_date: Option<String>,
    pub next_service_mileage: Option<i64>,
}

impl From<Vehicle> for VehiclePredictionResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.to_string(),
            license_plate: vehicle.license_plate,
            mileage: vehicle.mileage,
            average_daily_mileage: vehicle.average_daily_mileage,
            next_service_date: vehicle.next_service_date.map(|d| d.to_string()),
            next_service_mileage: vehicle.next_service_mileage,
        }
    }
}
