//! Predictor del próximo mantenimiento
//!
//! Selecciona el intervalo aplicable, estima la tasa diaria y reconcilia la
//! fecha por kilometraje con la fecha por calendario, quedándose siempre con
//! el vencimiento MÁS TEMPRANO. Nunca falla por datos escasos: la ausencia
//! de historial es el caso común (vehículos recién dados de alta) y cada
//! rama termina en una respuesta numérica.
//!
//! El predictor es puro: la persistencia de la predicción sobre el vehículo
//! es responsabilidad del service layer, dentro de una transacción.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::config::PredictionConfig;
use crate::models::{IntervalDefinition, Vehicle};
use crate::services::daily_rate::estimate_daily_rate;
use crate::services::interval_catalog::applicable_intervals;
use crate::services::observation_store::VehicleHistory;

/// Sentinela de días cuando la tasa fuera cero (defensivo: el estimador
/// garantiza tasa > 0); fuerza a preferir la fecha por calendario
const DEGENERATE_DAYS_SENTINEL: f64 = 9999.0;

/// Origen de la predicción
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    /// Derivada de un IntervalDefinition aplicable
    Interval(uuid::Uuid),
    /// Predicción por defecto: +10 000 km / +365 días
    Fallback,
}

/// Resultado completo de una corrida de predicción
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub next_date: NaiveDate,
    pub next_mileage: i64,
    pub daily_rate: f64,
    pub rate_strategy: &'static str,
    pub source: PredictionSource,
}

/// Calcular la próxima fecha y kilometraje de mantenimiento de un vehículo
pub fn predict(
    vehicle: &Vehicle,
    history: &VehicleHistory,
    catalog: &[IntervalDefinition],
    today: NaiveDate,
    config: &PredictionConfig,
) -> Prediction {
    // la tasa se estima siempre: forma parte de la caché del vehículo
    // aunque la fecha/kilometraje salgan por el camino fallback
    let estimate = estimate_daily_rate(vehicle, history, today, config);

    let intervals = applicable_intervals(catalog, &vehicle.make, &vehicle.model);
    let Some(interval) = intervals.first() else {
        let fallback = fallback_prediction(vehicle, today, config);
        debug!(vehicle_id = %vehicle.id, "sin intervalos aplicables: predicción fallback");
        return Prediction {
            next_date: fallback.0,
            next_mileage: fallback.1,
            daily_rate: estimate.rate,
            rate_strategy: estimate.strategy,
            source: PredictionSource::Fallback,
        };
    };

    // kilometraje objetivo: el último punto de mantenimiento confirmado
    // (máximo del historial) manda, sin importar qué intervalo satisfizo
    let mut next_mileage: Option<i64> = match (
        history.max_service_mileage(),
        interval.mileage_interval,
    ) {
        (Some(max_mileage), Some(step)) => Some(max_mileage + step),
        _ => None,
    };

    // base de la fecha: servicio más reciente de ESTE intervalo, luego
    // cualquier servicio, luego la caché del vehículo, luego hoy
    let date_basis = history
        .service_records_for_interval_desc(interval.id)
        .next()
        .map(|r| r.service_date)
        .or_else(|| {
            history
                .service_records_desc()
                .first()
                .map(|r| r.service_date)
        })
        .or(vehicle.last_service_date)
        .unwrap_or(today);

    let time_step = interval
        .time_interval_days
        .unwrap_or(config.fallback_time_interval_days);
    let mut next_date = date_basis + Duration::days(time_step);

    // proyección kilometraje→fecha, solo sobre objetivos confirmados por
    // historial de servicios: a qué fecha llegaría el odómetro al objetivo,
    // dada la tasa diaria estimada
    if let Some(target) = next_mileage {
        let days_until = if estimate.rate > 0.0 {
            (target - vehicle.mileage) as f64 / estimate.rate
        } else {
            DEGENERATE_DAYS_SENTINEL
        };
        let mileage_based_date = today + Duration::days(days_until.round() as i64);

        if interval.interval_type.includes_mileage() && mileage_based_date < next_date {
            // siempre gana el vencimiento más temprano
            next_date = mileage_based_date;
        }
    }

    if next_mileage.is_none() {
        let mileage_basis = vehicle.last_service_mileage.unwrap_or(vehicle.mileage);
        next_mileage = interval.mileage_interval.map(|step| mileage_basis + step);
    }

    if next_mileage.is_none() {
        // intervalo solo temporal: derivar el kilometraje desde la fecha
        let days_until = (next_date - today).num_days().max(0);
        next_mileage =
            Some(vehicle.mileage + (estimate.rate * days_until as f64).round() as i64);
    }

    match next_mileage {
        Some(next_mileage) => {
            debug!(
                vehicle_id = %vehicle.id,
                %next_date,
                next_mileage,
                rate = estimate.rate,
                "predicción calculada"
            );
            Prediction {
                next_date,
                next_mileage,
                daily_rate: estimate.rate,
                rate_strategy: estimate.strategy,
                source: PredictionSource::Interval(interval.id),
            }
        }
        // inalcanzable con los pasos anteriores; se conserva por totalidad
        None => {
            let fallback = fallback_prediction(vehicle, today, config);
            Prediction {
                next_date: fallback.0,
                next_mileage: fallback.1,
                daily_rate: estimate.rate,
                rate_strategy: estimate.strategy,
                source: PredictionSource::Fallback,
            }
        }
    }
}

/// Predicción por defecto cuando no aplica ningún intervalo:
/// +10 000 km sobre el último servicio (o el odómetro actual) y +365 días
/// sobre la última fecha de servicio (o hoy)
fn fallback_prediction(
    vehicle: &Vehicle,
    today: NaiveDate,
    config: &PredictionConfig,
) -> (NaiveDate, i64) {
    let next_mileage = vehicle.last_service_mileage.unwrap_or(vehicle.mileage)
        + config.fallback_mileage_interval;
    let next_date = vehicle.last_service_date.unwrap_or(today)
        + Duration::days(config.fallback_time_interval_days);
    (next_date, next_mileage)
}
