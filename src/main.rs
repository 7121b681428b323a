use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use delivery_tariffs::{create_app, AppState, EnvironmentConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Fargo Delivery Tariffs - API");
    info!("================================================");
    info!("🌍 Entorno: {} | idioma por defecto: {}", config.environment, config.default_language);

    if !config.fargo.has_credentials() {
        warn!("⚠️ FARGO_USERNAME/FARGO_PASSWORD sin configurar: las llamadas upstream fallarán");
    }

    let app_state = AppState::new(config.clone())
        .map_err(|e| anyhow::anyhow!("Error inicializando el estado: {}", e))?;

    // Cargar el catálogo en segundo plano; mientras tanto la elegibilidad difiere
    let loader_state = app_state.clone();
    tokio::spawn(async move {
        loader_state.reload_catalog().await;
    });

    let app = create_app(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/ping - Endpoint de prueba");
    info!("🏙️ Proxy upstream:");
    info!("   GET  /api/cities - Ciudades");
    info!("   GET  /api/warehouses - Oficinas");
    info!("   GET  /api/lockers - Postamats");
    info!("   POST /api/calculate-tariff - Cálculo directo por coordenadas");
    info!("🗺️ Referencia:");
    info!("   GET  /api/regions - Regiones");
    info!("   GET  /api/regions/:region_id/cities - Ciudades de una región");
    info!("   GET  /api/cities/search?q= - Búsqueda de ciudades");
    info!("🧮 Calculador:");
    info!("   POST /api/eligibility - Elegibilidad de una selección");
    info!("   POST /api/calculator/quote - Cálculo con comprobación de elegibilidad");
    info!("📦 Catálogo:");
    info!("   GET  /api/service-points - Directorio de oficinas y postamats");
    info!("   GET  /api/catalog/status - Estado del catálogo");
    info!("   POST /api/catalog/reload - Recargar catálogo");
    info!("   GET  /api/coverage/audit - Auditoría de cobertura");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
