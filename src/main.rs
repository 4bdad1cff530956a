use anyhow::Result;
use dotenvy::dotenv;
use tracing::{error, info};

use garage_maintenance::config::{EnvironmentConfig, PredictionConfig};
use garage_maintenance::database::create_pool;
use garage_maintenance::services::PredictionService;

/// Runner de recomputación: recorre todo el parque y refresca la caché de
/// predicción de cada vehículo. Pensado para correr como job programado o
/// a mano tras cargas masivas de historial.
#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let env_config = EnvironmentConfig::default();

    // Configurar logging
    let level: tracing::Level = env_config
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🔧 Garage Maintenance - recomputación de predicciones");
    info!("====================================================");
    if env_config.is_development() {
        info!("⚙️  Modo desarrollo");
    }

    let pool = match create_pool(Some(&env_config.database_url)).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = PredictionConfig::from_env();
    let service = PredictionService::new(pool, config);

    match service.recompute_all().await {
        Ok(total) => {
            info!("🏁 Recomputación terminada: {} vehículos", total);
            Ok(())
        }
        Err(e) => {
            error!("❌ Error recomputando predicciones: {}", e);
            Err(anyhow::anyhow!("Error de recomputación: {}", e))
        }
    }
}
