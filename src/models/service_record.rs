//! Modelo de ServiceRecord
//!
//! Historial de mantenimientos completados. Se crea automáticamente al
//! cerrar un servicio marcado como mantenimiento rutinario con intervalo
//! asociado; nunca para reparaciones puntuales. Uno-a-uno con el servicio
//! que lo originó y append-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registro de mantenimiento completado
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    /// Servicio que originó este registro (uno-a-uno)
    pub service_id: Uuid,
    /// IntervalDefinition que este mantenimiento satisface, si se conoce
    pub interval_id: Option<Uuid>,
    /// Odómetro al momento del servicio (km)
    pub service_mileage: i64,
    pub service_date: NaiveDate,
}
