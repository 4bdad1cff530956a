use crate::models::{IntervalDefinition, MileageObservation, ServiceRecord};
use crate::services::observation_store::VehicleHistory;
use crate::utils::errors::AppResult;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Acceso a las dos series temporales del vehículo y al catálogo de
/// intervalos. Lecturas y altas append-only: ni observaciones ni registros
/// de servicio se editan después de creados.
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cargar el historial completo de un vehículo dentro de la transacción
    /// de la corrida de predicción
    pub async fn load_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
    ) -> AppResult<VehicleHistory> {
        let observations = sqlx::query_as::<_, MileageObservation>(
            "SELECT * FROM mileage_observations WHERE vehicle_id = $1 ORDER BY recorded_at DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&mut **tx)
        .await?;

        let service_records = sqlx::query_as::<_, ServiceRecord>(
            r#"
            SELECT * FROM service_records
            WHERE vehicle_id = $1
            ORDER BY service_date DESC, service_mileage DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(VehicleHistory::new(observations, service_records))
    }

    /// Catálogo completo de definiciones de intervalo, leído en la misma
    /// transacción que el resto de la corrida de predicción
    pub async fn load_interval_catalog(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> AppResult<Vec<IntervalDefinition>> {
        let catalog = sqlx::query_as::<_, IntervalDefinition>(
            "SELECT * FROM interval_definitions ORDER BY name",
        )
        .fetch_all(&mut **tx)
        .await?;

        Ok(catalog)
    }

    pub async fn insert_observation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
        value: i64,
    ) -> AppResult<MileageObservation> {
        let observation = sqlx::query_as::<_, MileageObservation>(
            r#"
            INSERT INTO mileage_observations (id, vehicle_id, value, recorded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(value)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(observation)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_service_record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
        service_id: Uuid,
        interval_id: Option<Uuid>,
        service_mileage: i64,
        service_date: NaiveDate,
    ) -> AppResult<ServiceRecord> {
        let record = sqlx::query_as::<_, ServiceRecord>(
            r#"
            INSERT INTO service_records (id, vehicle_id, service_id, interval_id, service_mileage, service_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(service_id)
        .bind(interval_id)
        .bind(service_mileage)
        .bind(service_date)
        .fetch_one(&mut **tx)
        .await?;

        Ok(record)
    }

    pub async fn insert_interval_definition(
        &self,
        definition: &IntervalDefinition,
    ) -> AppResult<IntervalDefinition> {
        // validación cross-field en escritura (campos requeridos por tipo)
        definition.validate_fields()?;

        let stored = sqlx::query_as::<_, IntervalDefinition>(
            r#"
            INSERT INTO interval_definitions
                (id, name, interval_type, mileage_interval, time_interval_days, car_make, car_model, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(definition.id)
        .bind(&definition.name)
        .bind(definition.interval_type)
        .bind(definition.mileage_interval)
        .bind(definition.time_interval_days)
        .bind(&definition.car_make)
        .bind(&definition.car_model)
        .bind(definition.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }
}
