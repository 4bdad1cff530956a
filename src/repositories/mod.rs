//! Repositorios de acceso a datos
//!
//! Consultas sqlx contra PostgreSQL. Las escrituras que participan en el
//! ciclo leer-calcular-escribir de la predicción reciben la transacción del
//! caller en vez de abrir la suya.

pub mod history_repository;
pub mod vehicle_repository;

pub use history_repository::HistoryRepository;
pub use vehicle_repository::VehicleRepository;
