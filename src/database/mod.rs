//! Módulo de base de datos
//!
//! Maneja la conexión al PostgreSQL del taller.

pub mod connection;

pub use connection::create_pool;
