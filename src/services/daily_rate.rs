//! Estimador de kilometraje diario promedio
//!
//! Produce una cifra creíble de km/día incluso con datos dispersos, ruidosos
//! o concentrados en un solo día calendario. La heurística en cascada está
//! expresada como una tabla ordenada de estrategias con nombre: cada una
//! declara su predicado de aplicabilidad devolviendo `None` cuando no
//! aplica, y el estimador recorre la tabla en orden de prioridad fijo
//! quedándose con el primer resultado. El resultado lleva el nombre de la
//! estrategia que disparó, para diagnóstico y tests sin parsear logs.
//!
//! Contrato: el resultado es siempre estrictamente positivo y ninguna rama
//! divide por cero (los conteos de días se acotan por debajo a 1 o 7).

use chrono::NaiveDate;
use tracing::debug;

use crate::config::PredictionConfig;
use crate::models::Vehicle;
use crate::services::observation_store::{PointKind, VehicleHistory};

/// Entrada inmutable compartida por todas las estrategias
pub struct EstimatorContext<'a> {
    pub vehicle: &'a Vehicle,
    pub history: &'a VehicleHistory,
    pub today: NaiveDate,
    pub config: &'a PredictionConfig,
}

/// Resultado del estimador: tasa en km/día y estrategia que la produjo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEstimate {
    pub rate: f64,
    pub strategy: &'static str,
}

type Strategy = fn(&EstimatorContext) -> Option<f64>;

/// Tabla de estrategias en orden estricto de prioridad
const STRATEGIES: &[(&str, Strategy)] = &[
    ("registered_today", registered_today),
    ("no_history", no_history),
    ("early_service_only", early_service_only),
    ("same_day_cluster", same_day_cluster),
    ("new_high_mileage", new_high_mileage),
    ("combined_events", combined_events),
    ("service_history_only", service_history_only),
    ("observations_only", observations_only),
    ("lifetime_average", lifetime_average),
    ("stored_value", stored_value),
];

/// Estimar el kilometraje diario promedio de un vehículo
pub fn estimate_daily_rate(
    vehicle: &Vehicle,
    history: &VehicleHistory,
    today: NaiveDate,
    config: &PredictionConfig,
) -> RateEstimate {
    let ctx = EstimatorContext {
        vehicle,
        history,
        today,
        config,
    };

    for &(name, strategy) in STRATEGIES {
        if let Some(rate) = strategy(&ctx) {
            // el contrato exige tasa estrictamente positiva
            let rate = if rate > 0.0 {
                rate
            } else {
                config.default_daily_rate
            };
            debug!(
                vehicle_id = %vehicle.id,
                strategy = name,
                rate,
                "tasa diaria estimada"
            );
            return RateEstimate {
                rate,
                strategy: name,
            };
        }
    }

    debug!(vehicle_id = %vehicle.id, "sin datos: tasa por defecto");
    RateEstimate {
        rate: config.default_daily_rate,
        strategy: "default",
    }
}

/// 1. Vehículo dado de alta hoy, todavía sin historial. Solo podemos mirar
/// la diferencia entre odómetro actual e inicial.
fn registered_today(ctx: &EstimatorContext) -> Option<f64> {
    if ctx.vehicle.created_date() != ctx.today || !ctx.history.is_empty() {
        return None;
    }

    let cfg = ctx.config;
    let diff = ctx.vehicle.accumulated_mileage();

    if diff > cfg.high_mileage_threshold {
        // se asume acumulado sobre una ventana de una semana
        Some(diff as f64 / cfg.assumed_window_days as f64)
    } else if ctx.vehicle.mileage > cfg.high_mileage_threshold {
        // vehículo de segunda mano con odómetro ya alto y diff pequeño
        if diff > 0 {
            Some(diff as f64)
        } else {
            Some(cfg.default_daily_rate)
        }
    } else {
        Some(cfg.default_daily_rate)
    }
}

/// 2. Sin lecturas ni servicios: no hay nada que extrapolar.
fn no_history(ctx: &EstimatorContext) -> Option<f64> {
    if ctx.history.is_empty() {
        Some(ctx.config.default_daily_rate)
    } else {
        None
    }
}

/// 3. Vehículo de ≤7 días, solo servicios y todos con la fecha del alta:
/// no hay dispersión temporal suficiente para extrapolar.
fn early_service_only(ctx: &EstimatorContext) -> Option<f64> {
    let created = ctx.vehicle.created_date();
    let young = ctx.vehicle.age_days(ctx.today) <= ctx.config.assumed_window_days;

    if young
        && !ctx.history.has_observations()
        && ctx.history.has_service_records()
        && ctx
            .history
            .service_records_desc()
            .iter()
            .all(|r| r.service_date == created)
    {
        Some(ctx.config.default_daily_rate)
    } else {
        None
    }
}

/// 4. Dos o más eventos con fecha de hoy. Si toda la vida del vehículo cabe
/// en un día, la amplitud max−min ES la tasa diaria. Si el vehículo es más
/// antiguo no devolvemos nada: esos mismos eventos ya alimentan la serie
/// combinada de la estrategia 6.
fn same_day_cluster(ctx: &EstimatorContext) -> Option<f64> {
    let mileages = ctx.history.event_mileages_on(ctx.today);
    if mileages.len() < 2 {
        return None;
    }

    let spread = mileages.iter().max()? - mileages.iter().min()?;
    if ctx.vehicle.created_date() == ctx.today && spread > 0 {
        return Some(spread as f64);
    }
    None
}

/// 5. Vehículo de ≤7 días con odómetro ya alto: acotar para no extrapolar
/// un salto grande único.
fn new_high_mileage(ctx: &EstimatorContext) -> Option<f64> {
    let cfg = ctx.config;
    if ctx.vehicle.age_days(ctx.today) <= cfg.assumed_window_days
        && ctx.vehicle.mileage > cfg.high_mileage_threshold
    {
        Some(capped_new_vehicle_rate(ctx))
    } else {
        None
    }
}

fn capped_new_vehicle_rate(ctx: &EstimatorContext) -> f64 {
    let cfg = ctx.config;
    cfg.new_vehicle_rate_cap
        .min(ctx.vehicle.mileage as f64 / cfg.assumed_window_days as f64)
}

/// 6. Serie combinada: alta sintética + servicios + lecturas + odómetro
/// actual, de donde tomamos el punto más nuevo y el más antiguo.
fn combined_events(ctx: &EstimatorContext) -> Option<f64> {
    let points = ctx.history.combined_points(ctx.vehicle, ctx.today);
    if points.len() < 2 {
        return None;
    }

    let newest = points.first()?;
    let oldest = points.last()?;

    // caso especial: el único dato real es un servicio de hoy sobre un
    // vehículo sin lecturas; misma acotación que la estrategia 5
    if oldest.kind == PointKind::Creation
        && newest.kind == PointKind::Service
        && newest.date == ctx.today
        && !ctx.history.has_observations()
    {
        return Some(capped_new_vehicle_rate(ctx));
    }

    let days = (newest.date - oldest.date).num_days().max(1);
    let delta = newest.mileage - oldest.mileage;
    let mut rate = delta as f64 / days as f64;

    // guardia de anomalías: un salto día-a-día desmedido se amortigua
    if days == 1 && delta > ctx.config.anomaly_jump_threshold {
        rate = ctx
            .config
            .anomaly_rate_cap
            .min(rate / ctx.config.anomaly_damping);
    }

    if rate > 0.0 {
        Some(rate)
    } else {
        None
    }
}

/// 7. Solo historial de servicios. Normalmente la estrategia 6 ya cubre
/// este caso por el sembrado de la serie combinada; se conserva como camino
/// independiente por robustez.
fn service_history_only(ctx: &EstimatorContext) -> Option<f64> {
    let records = ctx.history.service_records_desc();
    let cfg = ctx.config;

    let rate = match records {
        [] => return None,
        [only] => {
            let window = (only.service_date - ctx.vehicle.created_date()).num_days();
            let days = window.max(cfg.assumed_window_days);
            let mut rate =
                (only.service_mileage - ctx.vehicle.initial_mileage) as f64 / days as f64;
            if window <= cfg.assumed_window_days {
                rate = rate.min(cfg.new_vehicle_rate_cap);
            }
            rate
        }
        _ => {
            let newest = &records[0];
            let oldest = &records[records.len() - 1];
            let span = (newest.service_date - oldest.service_date).num_days();
            let days = span.max(1);
            let mut rate =
                (newest.service_mileage - oldest.service_mileage) as f64 / days as f64;
            if span <= cfg.assumed_window_days {
                rate = rate.min(cfg.new_vehicle_rate_cap);
            }
            rate
        }
    };

    if rate > 0.0 {
        Some(rate)
    } else {
        None
    }
}

/// 8. Solo lecturas de odómetro; simétrico a la estrategia 7.
fn observations_only(ctx: &EstimatorContext) -> Option<f64> {
    let observations = ctx.history.observations_desc();
    let cfg = ctx.config;

    let rate = match observations {
        [] => return None,
        [only] => {
            let window = (only.recorded_date() - ctx.vehicle.created_date()).num_days();
            let days = window.max(cfg.assumed_window_days);
            let mut rate = (only.value - ctx.vehicle.initial_mileage) as f64 / days as f64;
            if window <= cfg.assumed_window_days {
                rate = rate.min(cfg.new_vehicle_rate_cap);
            }
            rate
        }
        _ => {
            let newest = &observations[0];
            let oldest = &observations[observations.len() - 1];
            let span = (newest.recorded_date() - oldest.recorded_date()).num_days();
            let days = span.max(1);
            let mut rate = (newest.value - oldest.value) as f64 / days as f64;
            if span <= cfg.assumed_window_days {
                rate = rate.min(cfg.new_vehicle_rate_cap);
            }
            rate
        }
    };

    if rate > 0.0 {
        Some(rate)
    } else {
        None
    }
}

/// 9. Odómetro actual repartido sobre la vida del vehículo.
fn lifetime_average(ctx: &EstimatorContext) -> Option<f64> {
    if ctx.vehicle.mileage <= 0 {
        return None;
    }
    let age = ctx.vehicle.age_days(ctx.today);
    if age >= ctx.config.assumed_window_days {
        Some(ctx.vehicle.mileage as f64 / age as f64)
    } else {
        Some(ctx.config.default_daily_rate)
    }
}

/// 10. Reutilizar la tasa cacheada de una corrida anterior.
fn stored_value(ctx: &EstimatorContext) -> Option<f64> {
    ctx.vehicle.average_daily_mileage.filter(|rate| *rate > 0.0)
}
