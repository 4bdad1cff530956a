//! Configuración del sistema
//!
//! Variables de entorno y constantes del motor de predicción.

pub mod environment;
pub mod prediction;

pub use environment::EnvironmentConfig;
pub use prediction::PredictionConfig;
