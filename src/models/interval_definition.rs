//! Modelo de IntervalDefinition
//!
//! Reglas de mantenimiento: cada cuántos kilómetros y/o días se repite un
//! mantenimiento, opcionalmente acotado a una marca/modelo concreto.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppResult};

/// Tipo de intervalo - mapea al ENUM interval_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "interval_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    Mileage,
    Time,
    Both,
}

impl IntervalType {
    pub fn includes_mileage(self) -> bool {
        matches!(self, IntervalType::Mileage | IntervalType::Both)
    }

    pub fn includes_time(self) -> bool {
        matches!(self, IntervalType::Time | IntervalType::Both)
    }
}

/// Regla de mantenimiento programado
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IntervalDefinition {
    pub id: Uuid,
    pub name: String,
    pub interval_type: IntervalType,
    /// Requerido cuando el tipo incluye kilometraje (km)
    pub mileage_interval: Option<i64>,
    /// Requerido cuando el tipo incluye tiempo (días)
    pub time_interval_days: Option<i64>,
    /// Acotación opcional: modelo requiere marca
    pub car_make: Option<String>,
    pub car_model: Option<String>,
    pub is_active: bool,
}

impl IntervalDefinition {
    /// Validación cross-field en escritura: los campos requeridos por el
    /// tipo deben estar presentes, y el modelo implica la marca.
    pub fn validate_fields(&self) -> AppResult<()> {
        if self.interval_type.includes_mileage() && self.mileage_interval.is_none() {
            return Err(validation_error(
                "mileage_interval",
                "required when interval_type includes mileage",
            ));
        }
        if self.interval_type.includes_time() && self.time_interval_days.is_none() {
            return Err(validation_error(
                "time_interval_days",
                "required when interval_type includes time",
            ));
        }
        if self.car_model.is_some() && self.car_make.is_none() {
            return Err(validation_error(
                "car_model",
                "car_model requires car_make to be set",
            ));
        }
        if matches!(self.mileage_interval, Some(v) if v <= 0) {
            return Err(validation_error("mileage_interval", "must be positive"));
        }
        if matches!(self.time_interval_days, Some(v) if v <= 0) {
            return Err(validation_error("time_interval_days", "must be positive"));
        }
        Ok(())
    }

    /// Especificidad de la acotación: (marca+modelo) > (marca) > global
    pub fn specificity(&self) -> u8 {
        match (&self.car_make, &self.car_model) {
            (Some(_), Some(_)) => 2,
            (Some(_), None) => 1,
            _ => 0,
        }
    }

    /// ¿Aplica esta definición a un vehículo con esta marca/modelo?
    pub fn matches(&self, make: &str, model: &str) -> bool {
        match (&self.car_make, &self.car_model) {
            (None, _) => true,
            (Some(m), None) => m.eq_ignore_ascii_case(make),
            (Some(m), Some(md)) => {
                m.eq_ignore_ascii_case(make) && md.eq_ignore_ascii_case(model)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(interval_type: IntervalType) -> IntervalDefinition {
        IntervalDefinition {
            id: Uuid::new_v4(),
            name: "Cambio de aceite".to_string(),
            interval_type,
            mileage_interval: None,
            time_interval_days: None,
            car_make: None,
            car_model: None,
            is_active: true,
        }
    }

    #[test]
    fn test_type_required_fields() {
        // tipo mileage sin mileage_interval debe rechazarse
        let def = interval(IntervalType::Mileage);
        assert!(def.validate_fields().is_err());

        let mut def = interval(IntervalType::Both);
        def.mileage_interval = Some(10_000);
        assert!(def.validate_fields().is_err());
        def.time_interval_days = Some(365);
        assert!(def.validate_fields().is_ok());
    }

    #[test]
    fn test_model_requires_make() {
        let mut def = interval(IntervalType::Time);
        def.time_interval_days = Some(180);
        def.car_model = Some("Clio".to_string());
        assert!(def.validate_fields().is_err());
        def.car_make = Some("Renault".to_string());
        assert!(def.validate_fields().is_ok());
    }

    #[test]
    fn test_specificity_and_matching() {
        let mut def = interval(IntervalType::Time);
        def.time_interval_days = Some(365);
        assert_eq!(def.specificity(), 0);
        assert!(def.matches("Renault", "Clio"));

        def.car_make = Some("Renault".to_string());
        assert_eq!(def.specificity(), 1);
        assert!(def.matches("renault", "Megane"));
        assert!(!def.matches("Peugeot", "208"));

        def.car_model = Some("Clio".to_string());
        assert_eq!(def.specificity(), 2);
        assert!(def.matches("Renault", "clio"));
        assert!(!def.matches("Renault", "Megane"));
    }
}
