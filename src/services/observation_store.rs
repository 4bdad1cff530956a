//! Vista de solo lectura sobre el historial de un vehículo
//!
//! Reúne las dos series temporales del vehículo (lecturas de odómetro y
//! mantenimientos completados) y expone las proyecciones que consumen el
//! estimador y el predictor. El alta del vehículo se modela explícitamente
//! como observación sintética cero en la serie combinada, en vez de tratarla
//! como caso especial dentro del algoritmo.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{MileageObservation, ServiceRecord, Vehicle};

/// Origen de un punto de la serie combinada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// Punto sintético: (fecha de alta, kilometraje inicial)
    Creation,
    Service,
    Observation,
    /// Punto sintético: (hoy, kilometraje actual)
    Current,
}

/// Punto fechado (fecha, kilometraje) de la serie combinada
#[derive(Debug, Clone, Copy)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub mileage: i64,
    pub kind: PointKind,
}

/// Historial completo de un vehículo, ya cargado en memoria
#[derive(Debug, Clone, Default)]
pub struct VehicleHistory {
    observations: Vec<MileageObservation>,
    service_records: Vec<ServiceRecord>,
}

impl VehicleHistory {
    pub fn new(
        mut observations: Vec<MileageObservation>,
        mut service_records: Vec<ServiceRecord>,
    ) -> Self {
        // normalizar orden: más reciente primero
        observations.sort_by(|a, b| {
            (b.recorded_at, b.value).cmp(&(a.recorded_at, a.value))
        });
        service_records.sort_by(|a, b| {
            (b.service_date, b.service_mileage).cmp(&(a.service_date, a.service_mileage))
        });
        Self {
            observations,
            service_records,
        }
    }

    /// Lecturas de odómetro, la más reciente primero
    pub fn observations_desc(&self) -> &[MileageObservation] {
        &self.observations
    }

    /// Mantenimientos completados, por fecha desc y kilometraje desc
    pub fn service_records_desc(&self) -> &[ServiceRecord] {
        &self.service_records
    }

    /// Mantenimientos que satisfacen un intervalo concreto, mismo orden
    pub fn service_records_for_interval_desc(
        &self,
        interval_id: Uuid,
    ) -> impl Iterator<Item = &ServiceRecord> {
        self.service_records
            .iter()
            .filter(move |r| r.interval_id == Some(interval_id))
    }

    /// Kilometraje más alto registrado en todo el historial de servicios
    pub fn max_service_mileage(&self) -> Option<i64> {
        self.service_records
            .iter()
            .map(|r| r.service_mileage)
            .max()
    }

    pub fn has_observations(&self) -> bool {
        !self.observations.is_empty()
    }

    pub fn has_service_records(&self) -> bool {
        !self.service_records.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty() && self.service_records.is_empty()
    }

    /// Kilometrajes de todos los eventos (lecturas + servicios) con fecha
    /// igual a `date`
    pub fn event_mileages_on(&self, date: NaiveDate) -> Vec<i64> {
        let mut mileages: Vec<i64> = self
            .observations
            .iter()
            .filter(|o| o.recorded_date() == date)
            .map(|o| o.value)
            .collect();
        mileages.extend(
            self.service_records
                .iter()
                .filter(|r| r.service_date == date)
                .map(|r| r.service_mileage),
        );
        mileages
    }

    /// Serie cronológica combinada: alta sintética + servicios + lecturas +
    /// (hoy, kilometraje actual) si difiere del inicial. Ordenada de más
    /// reciente a más antigua por (fecha, kilometraje), sin duplicados
    /// exactos.
    pub fn combined_points(&self, vehicle: &Vehicle, today: NaiveDate) -> Vec<HistoryPoint> {
        let mut points = Vec::with_capacity(
            2 + self.observations.len() + self.service_records.len(),
        );

        points.push(HistoryPoint {
            date: vehicle.created_date(),
            mileage: vehicle.initial_mileage,
            kind: PointKind::Creation,
        });
        for record in &self.service_records {
            points.push(HistoryPoint {
                date: record.service_date,
                mileage: record.service_mileage,
                kind: PointKind::Service,
            });
        }
        for obs in &self.observations {
            points.push(HistoryPoint {
                date: obs.recorded_date(),
                mileage: obs.value,
                kind: PointKind::Observation,
            });
        }
        if vehicle.mileage != vehicle.initial_mileage {
            points.push(HistoryPoint {
                date: today,
                mileage: vehicle.mileage,
                kind: PointKind::Current,
            });
        }

        points.sort_by(|a, b| (b.date, b.mileage).cmp(&(a.date, a.mileage)));
        points.dedup_by(|a, b| a.date == b.date && a.mileage == b.mileage);
        points
    }
}
