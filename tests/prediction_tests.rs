//! Suite de propiedades del motor de predicción
//!
//! Ejercita el estimador y el predictor de punta a punta sobre historiales
//! construidos en memoria. Las capas puras no necesitan base de datos.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use garage_maintenance::config::PredictionConfig;
use garage_maintenance::models::{
    IntervalDefinition, IntervalType, MileageObservation, ServiceRecord, Vehicle,
};
use garage_maintenance::services::daily_rate::estimate_daily_rate;
use garage_maintenance::services::observation_store::VehicleHistory;
use garage_maintenance::services::predictor::{predict, PredictionSource};
use garage_maintenance::services::validate_new_observation;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn vehicle(initial: i64, current: i64, created: NaiveDate) -> Vehicle {
    Vehicle {
        id: Uuid::new_v4(),
        license_plate: "GA-001-ZZ".to_string(),
        make: "Renault".to_string(),
        model: "Clio".to_string(),
        mileage: current,
        initial_mileage: initial,
        created_at: Utc.from_utc_datetime(&created.and_hms_opt(8, 30, 0).unwrap()),
        average_daily_mileage: None,
        last_service_date: None,
        last_service_mileage: None,
        next_service_date: None,
        next_service_mileage: None,
    }
}

fn obs(vehicle_id: Uuid, value: i64, date: NaiveDate) -> MileageObservation {
    MileageObservation {
        id: Uuid::new_v4(),
        vehicle_id,
        value,
        recorded_at: Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
    }
}

fn record(
    vehicle_id: Uuid,
    mileage: i64,
    date: NaiveDate,
    interval_id: Option<Uuid>,
) -> ServiceRecord {
    ServiceRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        service_id: Uuid::new_v4(),
        interval_id,
        service_mileage: mileage,
        service_date: date,
    }
}

fn global_interval(
    interval_type: IntervalType,
    mileage: Option<i64>,
    days: Option<i64>,
) -> IntervalDefinition {
    IntervalDefinition {
        id: Uuid::new_v4(),
        name: "Revisión general".to_string(),
        interval_type,
        mileage_interval: mileage,
        time_interval_days: days,
        car_make: None,
        car_model: None,
        is_active: true,
    }
}

fn cfg() -> PredictionConfig {
    PredictionConfig::default()
}

#[test]
fn empty_history_yields_exact_default_rate() {
    let today = d(2025, 8, 30);
    let history = VehicleHistory::default();

    for created in [today, d(2025, 8, 25), d(2024, 1, 1)] {
        let v = vehicle(0, 0, created);
        let estimate = estimate_daily_rate(&v, &history, today, &cfg());
        assert_eq!(estimate.rate, 50.0);
    }
}

#[test]
fn rate_is_always_strictly_positive() {
    let today = d(2025, 8, 30);
    let combos: Vec<(Vehicle, VehicleHistory)> = vec![
        (vehicle(0, 0, today), VehicleHistory::default()),
        (vehicle(90_000, 90_000, today), VehicleHistory::default()),
        {
            let v = vehicle(0, 0, d(2025, 8, 28));
            let h = VehicleHistory::new(vec![], vec![record(v.id, 0, d(2025, 8, 28), None)]);
            (v, h)
        },
        {
            // servicios con kilometraje no creciente: delta cero
            let v = vehicle(5000, 5000, d(2025, 1, 1));
            let h = VehicleHistory::new(
                vec![],
                vec![
                    record(v.id, 5000, d(2025, 2, 1), None),
                    record(v.id, 5000, d(2025, 5, 1), None),
                ],
            );
            (v, h)
        },
        {
            let v = vehicle(0, 400, today - Duration::days(3));
            let h = VehicleHistory::new(vec![obs(v.id, 400, today)], vec![]);
            (v, h)
        },
    ];

    for (v, history) in combos {
        let estimate = estimate_daily_rate(&v, &history, today, &cfg());
        assert!(
            estimate.rate > 0.0,
            "tasa no positiva ({}) vía {}",
            estimate.rate,
            estimate.strategy
        );
    }
}

#[test]
fn observation_below_current_mileage_is_rejected() {
    let v = vehicle(0, 12_000, d(2025, 1, 1));
    let history = VehicleHistory::default();

    assert!(validate_new_observation(&v, &history, 11_999).is_err());
    assert!(validate_new_observation(&v, &history, 12_000).is_ok());
}

#[test]
fn observation_below_latest_observation_is_rejected() {
    let v = vehicle(0, 10_000, d(2025, 1, 1));
    let history = VehicleHistory::new(vec![obs(v.id, 10_500, d(2025, 8, 1))], vec![]);

    // mayor que el odómetro del vehículo pero menor que la última lectura
    assert!(validate_new_observation(&v, &history, 10_200).is_err());
    assert!(validate_new_observation(&v, &history, 10_500).is_ok());
}

#[test]
fn predict_is_idempotent_without_new_observations() {
    let today = d(2025, 8, 30);
    let v = vehicle(5000, 21_000, d(2024, 8, 30));
    let def = global_interval(IntervalType::Both, Some(10_000), Some(365));
    let history = VehicleHistory::new(
        vec![obs(v.id, 21_000, d(2025, 8, 20))],
        vec![record(v.id, 15_000, d(2025, 2, 10), Some(def.id))],
    );
    let catalog = vec![def];

    let first = predict(&v, &history, &catalog, today, &cfg());
    let second = predict(&v, &history, &catalog, today, &cfg());
    assert_eq!(first, second);
}

#[test]
fn earliest_due_selection_both_ways() {
    let today = d(2025, 6, 1);
    let created = d(2025, 1, 2); // 150 días → 100 km/día con 15 000 km
    let v = vehicle(0, 15_000, created);

    // caso 1: la proyección por kilometraje cae antes y gana
    let def = global_interval(IntervalType::Both, Some(10_000), Some(365));
    let history = VehicleHistory::new(
        vec![obs(v.id, 15_000, today)],
        vec![record(v.id, 14_000, d(2025, 5, 22), Some(def.id))],
    );
    let p = predict(&v, &history, &[def], today, &cfg());
    assert_eq!(p.next_mileage, 24_000);
    assert_eq!(p.next_date, today + Duration::days(90));

    // caso 2: el intervalo temporal corto llega antes y gana
    let def = global_interval(IntervalType::Both, Some(30_000), Some(60));
    let history = VehicleHistory::new(
        vec![obs(v.id, 15_000, today)],
        vec![record(v.id, 14_000, d(2025, 5, 22), Some(def.id))],
    );
    let p = predict(&v, &history, &[def], today, &cfg());
    assert_eq!(p.next_date, d(2025, 5, 22) + Duration::days(60));
}

#[test]
fn brand_new_vehicle_with_global_interval() {
    let today = d(2025, 8, 30);
    let v = vehicle(0, 0, today);
    let catalog = vec![global_interval(IntervalType::Both, Some(10_000), Some(365))];

    let estimate = estimate_daily_rate(&v, &VehicleHistory::default(), today, &cfg());
    assert_eq!(estimate.rate, 50.0);

    let p = predict(&v, &VehicleHistory::default(), &catalog, today, &cfg());
    assert_eq!(p.next_mileage, 10_000);
    assert_eq!(p.next_date, today + Duration::days(365));
}

#[test]
fn sixty_day_vehicle_without_intervals_takes_fallback() {
    let today = d(2025, 8, 30);
    let created = today - Duration::days(60);
    let v = vehicle(10_000, 13_000, created);
    let history = VehicleHistory::new(
        vec![obs(v.id, 11_500, created + Duration::days(30))],
        vec![],
    );

    let estimate = estimate_daily_rate(&v, &history, today, &cfg());
    assert_eq!(estimate.rate, 50.0); // (13 000 − 10 000) / 60
    assert_eq!(estimate.strategy, "combined_events");

    let p = predict(&v, &history, &[], today, &cfg());
    assert_eq!(p.source, PredictionSource::Fallback);
    assert_eq!(p.next_mileage, 23_000);
    assert_eq!(p.next_date, today + Duration::days(365));
    assert_eq!(p.daily_rate, 50.0);
}

#[test]
fn max_service_mileage_beats_lower_current_mileage() {
    let today = d(2025, 8, 30);
    let v = vehicle(0, 18_000, d(2023, 1, 1));
    let def = global_interval(IntervalType::Mileage, Some(5000), None);
    let history = VehicleHistory::new(
        vec![],
        vec![record(v.id, 20_000, d(2025, 7, 1), Some(def.id))],
    );

    let p = predict(&v, &history, &[def], today, &cfg());
    assert_eq!(p.next_mileage, 25_000);
}

#[test]
fn same_day_pair_on_creation_day_returns_spread() {
    let today = d(2025, 8, 30);
    let v = vehicle(100, 350, today);
    let history = VehicleHistory::new(
        vec![obs(v.id, 100, today), obs(v.id, 350, today)],
        vec![],
    );

    let estimate = estimate_daily_rate(&v, &history, today, &cfg());
    assert_eq!(estimate.rate, 250.0);
    assert_eq!(estimate.strategy, "same_day_cluster");
}

#[test]
fn most_specific_interval_drives_the_prediction() {
    let today = d(2025, 8, 30);
    let v = vehicle(0, 30_000, d(2023, 1, 1));

    let global = global_interval(IntervalType::Mileage, Some(15_000), None);
    let mut by_model = global_interval(IntervalType::Mileage, Some(5000), None);
    by_model.car_make = Some("Renault".to_string());
    by_model.car_model = Some("Clio".to_string());

    let history = VehicleHistory::new(
        vec![],
        vec![record(v.id, 28_000, d(2025, 6, 1), Some(by_model.id))],
    );

    // el catálogo llega en cualquier orden; gana el acotado a marca+modelo
    let p = predict(&v, &history, &[global, by_model.clone()], today, &cfg());
    assert_eq!(p.source, PredictionSource::Interval(by_model.id));
    assert_eq!(p.next_mileage, 33_000);
}
