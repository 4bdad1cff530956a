use crate::models::Vehicle;
use crate::utils::errors::{AppError, AppResult};
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        license_plate: String,
        make: String,
        model: String,
        initial_mileage: i64,
    ) -> AppResult<Vehicle> {
        let id = Uuid::new_v4();

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, license_plate, make, model, mileage, initial_mileage, created_at)
            VALUES ($1, $2, $3, $4, $5, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(license_plate)
        .bind(make)
        .bind(model)
        .bind(initial_mileage)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list_ids(&self) -> AppResult<Vec<Uuid>> {
        let ids: Vec<(Uuid,)> =
            sqlx::query_as("SELECT id FROM vehicles ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Cargar el vehículo bloqueando su fila. Serializa corridas
    /// concurrentes de predicción sobre el mismo vehículo (ciclo
    /// leer-calcular-escribir).
    pub async fn find_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<Vehicle> {
        let vehicle =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        vehicle.ok_or_else(|| AppError::NotFound(format!("Vehicle '{}' not found", id)))
    }

    /// Subir el odómetro del vehículo. El invariante de monotonía se valida
    /// en el service layer antes de llegar aquí.
    pub async fn raise_mileage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        mileage: i64,
    ) -> AppResult<()> {
        sqlx::query("UPDATE vehicles SET mileage = $2 WHERE id = $1")
            .bind(id)
            .bind(mileage)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Actualizar la caché de último servicio tras un mantenimiento
    pub async fn store_last_service(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        date: NaiveDate,
        mileage: i64,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE vehicles SET last_service_date = $2, last_service_mileage = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(date)
        .bind(mileage)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Persistir la predicción y la tasa diaria: único efecto observable de
    /// una corrida del predictor
    pub async fn store_prediction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        average_daily_mileage: f64,
        next_service_date: NaiveDate,
        next_service_mileage: i64,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET average_daily_mileage = $2,
                next_service_date = $3,
                next_service_mileage = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(average_daily_mileage)
        .bind(next_service_date)
        .bind(next_service_mileage)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
