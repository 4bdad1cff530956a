//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod interval_definition;
pub mod mileage_observation;
pub mod service_record;
pub mod vehicle;

pub use interval_definition::{IntervalDefinition, IntervalType};
pub use mileage_observation::MileageObservation;
pub use service_record::ServiceRecord;
pub use vehicle::Vehicle;
