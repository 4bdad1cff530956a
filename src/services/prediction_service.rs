//! Orquestación de la predicción
//!
//! Puntos de disparo del motor: alta de una lectura de odómetro, cierre de
//! un mantenimiento rutinario y recomputación administrativa. Cada corrida
//! es un ciclo leer-calcular-escribir y va completa dentro de una
//! transacción con lock de fila sobre el vehículo, para que dos reportes en
//! rápida sucesión sobre el mismo vehículo no se pisen la caché.

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::config::PredictionConfig;
use crate::models::vehicle::VehiclePredictionResponse;
use crate::models::{MileageObservation, ServiceRecord, Vehicle};
use crate::repositories::{HistoryRepository, VehicleRepository};
use crate::services::predictor::{predict, Prediction};
use crate::utils::errors::{validation_error, AppResult};

/// Invariante de monotonía de las lecturas de odómetro: una lectura nueva
/// debe ser ≥ al odómetro actual y ≥ a la última lectura previa. Violarlo es
/// un error de validación, nunca una corrección silenciosa.
pub fn validate_new_observation(
    vehicle: &Vehicle,
    history: &crate::services::observation_store::VehicleHistory,
    value: i64,
) -> AppResult<()> {
    if value < vehicle.mileage {
        return Err(validation_error(
            "value",
            "mileage observation below the vehicle's current mileage",
        ));
    }
    if let Some(latest) = history.observations_desc().first() {
        if value < latest.value {
            return Err(validation_error(
                "value",
                "mileage observation below the most recent observation",
            ));
        }
    }
    Ok(())
}

pub struct PredictionService {
    pool: PgPool,
    vehicles: VehicleRepository,
    history: HistoryRepository,
    config: PredictionConfig,
}

impl PredictionService {
    pub fn new(pool: PgPool, config: PredictionConfig) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            history: HistoryRepository::new(pool.clone()),
            pool,
            config,
        }
    }

    /// Registrar una lectura de odómetro y recomputar la predicción.
    ///
    /// La lectura debe ser ≥ al odómetro actual y ≥ a la última lectura
    /// previa; si no, se rechaza con error de validación (nunca se corrige
    /// en silencio). Una lectura mayor sube `vehicle.mileage` como efecto
    /// secundario antes de recomputar.
    pub async fn record_mileage(
        &self,
        vehicle_id: Uuid,
        value: i64,
    ) -> AppResult<(MileageObservation, Prediction)> {
        let mut tx = self.pool.begin().await?;

        let mut vehicle = self.vehicles.find_for_update(&mut tx, vehicle_id).await?;
        let history = self.history.load_history(&mut tx, vehicle_id).await?;

        validate_new_observation(&vehicle, &history, value)?;

        let observation = self
            .history
            .insert_observation(&mut tx, vehicle_id, value)
            .await?;

        if value > vehicle.mileage {
            self.vehicles
                .raise_mileage(&mut tx, vehicle_id, value)
                .await?;
            vehicle.mileage = value;
        }

        // el historial recargado incluye la observación recién insertada
        let history = self.history.load_history(&mut tx, vehicle_id).await?;
        let prediction = self
            .recompute_in_tx(&mut tx, &vehicle, &history)
            .await?;

        tx.commit().await?;

        info!(
            vehicle_id = %vehicle_id,
            value,
            "📈 lectura de odómetro registrada y predicción actualizada"
        );
        Ok((observation, prediction))
    }

    /// Cerrar un servicio. Solo los mantenimientos rutinarios con intervalo
    /// asociado generan ServiceRecord y recomputación; las reparaciones
    /// puntuales no tocan el historial de mantenimiento.
    pub async fn complete_service(
        &self,
        vehicle_id: Uuid,
        service_id: Uuid,
        is_routine: bool,
        interval_id: Option<Uuid>,
        service_mileage: i64,
        service_date: NaiveDate,
    ) -> AppResult<Option<(ServiceRecord, Prediction)>> {
        let Some(interval_id) = interval_id.filter(|_| is_routine) else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await?;

        let mut vehicle = self.vehicles.find_for_update(&mut tx, vehicle_id).await?;

        if service_mileage > vehicle.mileage {
            return Err(validation_error(
                "service_mileage",
                "service record implies a mileage above the vehicle's odometer",
            ));
        }

        let record = self
            .history
            .insert_service_record(
                &mut tx,
                vehicle_id,
                service_id,
                Some(interval_id),
                service_mileage,
                service_date,
            )
            .await?;

        self.vehicles
            .store_last_service(&mut tx, vehicle_id, service_date, service_mileage)
            .await?;
        vehicle.last_service_date = Some(service_date);
        vehicle.last_service_mileage = Some(service_mileage);

        let history = self.history.load_history(&mut tx, vehicle_id).await?;
        let prediction = self
            .recompute_in_tx(&mut tx, &vehicle, &history)
            .await?;

        tx.commit().await?;

        info!(
            vehicle_id = %vehicle_id,
            service_mileage,
            "🔧 mantenimiento registrado y predicción actualizada"
        );
        Ok(Some((record, prediction)))
    }

    /// Recomputación explícita (administrativa) para un vehículo
    pub async fn recompute(&self, vehicle_id: Uuid) -> AppResult<Prediction> {
        let mut tx = self.pool.begin().await?;

        let vehicle = self.vehicles.find_for_update(&mut tx, vehicle_id).await?;
        let history = self.history.load_history(&mut tx, vehicle_id).await?;
        let prediction = self
            .recompute_in_tx(&mut tx, &vehicle, &history)
            .await?;

        tx.commit().await?;
        Ok(prediction)
    }

    /// Recomputar todas las predicciones del parque, vehículo por vehículo
    /// (cada uno en su propia transacción)
    pub async fn recompute_all(&self) -> AppResult<usize> {
        let ids = self.vehicles.list_ids().await?;
        let total = ids.len();

        for id in ids {
            self.recompute(id).await?;

            // reporte por vehículo con la predicción ya refrescada
            if let Some(vehicle) = self.vehicles.find_by_id(id).await? {
                let report = VehiclePredictionResponse::from(vehicle);
                info!(
                    "🚗 {}",
                    serde_json::to_string(&report).unwrap_or_default()
                );
            }
        }

        info!("✅ {} predicciones recomputadas", total);
        Ok(total)
    }

    /// Corrida del motor + persistencia de la caché, dentro de la
    /// transacción del caller
    async fn recompute_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle: &Vehicle,
        history: &crate::services::observation_store::VehicleHistory,
    ) -> AppResult<Prediction> {
        let catalog = self.history.load_interval_catalog(tx).await?;
        let today = Utc::now().date_naive();

        let prediction = predict(vehicle, history, &catalog, today, &self.config);

        self.vehicles
            .store_prediction(
                tx,
                vehicle.id,
                prediction.daily_rate,
                prediction.next_date,
                prediction.next_mileage,
            )
            .await?;

        Ok(prediction)
    }
}
