//! Services module
//!
//! Este módulo contiene la lógica de negocio de la predicción de
//! mantenimiento: catálogo de intervalos, vista del historial, estimador de
//! tasa diaria, predictor y la orquestación transaccional.

pub mod daily_rate;
pub mod interval_catalog;
pub mod observation_store;
pub mod prediction_service;
pub mod predictor;

pub use daily_rate::{estimate_daily_rate, RateEstimate};
pub use interval_catalog::applicable_intervals;
pub use observation_store::VehicleHistory;
pub use prediction_service::{validate_new_observation, PredictionService};
pub use predictor::{predict, Prediction, PredictionSource};
