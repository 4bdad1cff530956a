//! Motor de predicción de mantenimiento para el backend del taller
//!
//! Dado el historial de kilometraje y de mantenimientos completados de un
//! vehículo, estima su kilometraje diario promedio y la fecha/odómetro del
//! próximo mantenimiento programado. El cálculo es puro y síncrono; la capa
//! de servicios lo envuelve en transacciones PostgreSQL para los puntos de
//! disparo (lecturas nuevas, cierres de servicio, recomputación admin).

pub mod config;
pub mod database;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
