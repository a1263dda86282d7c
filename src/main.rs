use actix_web::{web, App, HttpServer};
use inkgen::{
    logger::{self, LoggerConfig},
    server::{self, AppState},
    InkError, Settings,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env().with_prefix("inkgen"))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let settings = Settings::from_env();
    logger::log_config_info(&settings);

    if let Err(InkError::Configuration(problems)) = settings.validate() {
        for problem in &problems {
            log::error!("❌ {}", problem);
        }
        return Err(InkError::Configuration(problems).into());
    }

    let state = web::Data::new(AppState::from_settings(&settings)?);

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &settings.server.host,
        settings.server.port,
    );

    HttpServer::new(move || App::new().app_data(state.clone()).configure(server::configure))
        .bind((settings.server.host.as_str(), settings.server.port))?
        .run()
        .await?;

    log::info!("👋 Server stopped");
    Ok(())
}
