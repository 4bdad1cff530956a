//! Constantes del motor de predicción
//!
//! Los valores por defecto vienen calibrados empíricamente sobre el parque
//! real del taller; se pueden ajustar por variable de entorno sin recompilar.

use std::env;

/// Parámetros del estimador de kilometraje diario y del predictor
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    /// Tasa por defecto cuando no hay historial (km/día)
    pub default_daily_rate: f64,
    /// Umbral de kilometraje "alto" para vehículos recién registrados (km)
    pub high_mileage_threshold: i64,
    /// Ventana asumida para repartir kilometraje acumulado sin fechas (días)
    pub assumed_window_days: i64,
    /// Tope de tasa para vehículos nuevos con kilometraje alto (km/día)
    pub new_vehicle_rate_cap: f64,
    /// Salto día-a-día considerado anómalo (km)
    pub anomaly_jump_threshold: i64,
    /// Tope absoluto aplicado a una tasa anómala (km/día)
    pub anomaly_rate_cap: f64,
    /// Divisor de amortiguación para tasas anómalas
    pub anomaly_damping: f64,
    /// Intervalo de kilometraje del fallback cuando no aplica ningún
    /// IntervalDefinition (km)
    pub fallback_mileage_interval: i64,
    /// Intervalo temporal del fallback (días)
    pub fallback_time_interval_days: i64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            default_daily_rate: 50.0,
            high_mileage_threshold: 500,
            assumed_window_days: 7,
            new_vehicle_rate_cap: 200.0,
            anomaly_jump_threshold: 1000,
            anomaly_rate_cap: 1000.0,
            anomaly_damping: 10.0,
            fallback_mileage_interval: 10_000,
            fallback_time_interval_days: 365,
        }
    }
}

impl PredictionConfig {
    /// Cargar la configuración aplicando overrides del entorno
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = read_f64("PREDICTION_DEFAULT_DAILY_RATE") {
            config.default_daily_rate = v;
        }
        if let Some(v) = read_i64("PREDICTION_HIGH_MILEAGE_THRESHOLD") {
            config.high_mileage_threshold = v;
        }
        if let Some(v) = read_i64("PREDICTION_ASSUMED_WINDOW_DAYS") {
            config.assumed_window_days = v;
        }
        if let Some(v) = read_f64("PREDICTION_NEW_VEHICLE_RATE_CAP") {
            config.new_vehicle_rate_cap = v;
        }
        if let Some(v) = read_i64("PREDICTION_ANOMALY_JUMP_THRESHOLD") {
            config.anomaly_jump_threshold = v;
        }
        if let Some(v) = read_f64("PREDICTION_ANOMALY_RATE_CAP") {
            config.anomaly_rate_cap = v;
        }
        if let Some(v) = read_f64("PREDICTION_ANOMALY_DAMPING") {
            config.anomaly_damping = v;
        }
        if let Some(v) = read_i64("PREDICTION_FALLBACK_MILEAGE_INTERVAL") {
            config.fallback_mileage_interval = v;
        }
        if let Some(v) = read_i64("PREDICTION_FALLBACK_TIME_INTERVAL_DAYS") {
            config.fallback_time_interval_days = v;
        }

        config
    }
}

fn read_i64(key: &str) -> Option<i64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn read_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = PredictionConfig::default();
        assert_eq!(config.default_daily_rate, 50.0);
        assert_eq!(config.high_mileage_threshold, 500);
        assert_eq!(config.fallback_mileage_interval, 10_000);
        assert_eq!(config.fallback_time_interval_days, 365);
    }

    #[test]
    fn test_env_overrides_every_constant() {
        let keys = [
            ("PREDICTION_DEFAULT_DAILY_RATE", "60"),
            ("PREDICTION_HIGH_MILEAGE_THRESHOLD", "600"),
            ("PREDICTION_ASSUMED_WINDOW_DAYS", "14"),
            ("PREDICTION_NEW_VEHICLE_RATE_CAP", "250"),
            ("PREDICTION_ANOMALY_JUMP_THRESHOLD", "2000"),
            ("PREDICTION_ANOMALY_RATE_CAP", "1500"),
            ("PREDICTION_ANOMALY_DAMPING", "5"),
            ("PREDICTION_FALLBACK_MILEAGE_INTERVAL", "15000"),
            ("PREDICTION_FALLBACK_TIME_INTERVAL_DAYS", "180"),
        ];
        for (key, value) in keys {
            env::set_var(key, value);
        }

        let config = PredictionConfig::from_env();

        for (key, _) in keys {
            env::remove_var(key);
        }

        assert_eq!(config.default_daily_rate, 60.0);
        assert_eq!(config.high_mileage_threshold, 600);
        assert_eq!(config.assumed_window_days, 14);
        assert_eq!(config.new_vehicle_rate_cap, 250.0);
        assert_eq!(config.anomaly_jump_threshold, 2000);
        assert_eq!(config.anomaly_rate_cap, 1500.0);
        assert_eq!(config.anomaly_damping, 5.0);
        assert_eq!(config.fallback_mileage_interval, 15_000);
        assert_eq!(config.fallback_time_interval_days, 180);
    }
}
