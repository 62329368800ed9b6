use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::infrastructure::config::{Config, ConfigService};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn serve() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = ConfigService::new().load()?;
    init_tracing(&config);
    info!(host = %config.host, port = config.port, "Starting tabviz");

    let state = crate::infrastructure::bootstrap::setup(&config)?;
    let server = crate::interfaces::http::start_server(state, &config.host, config.port)?;
    server.await?;

    info!("Server stopped");
    Ok(())
}

pub fn run() -> std::process::ExitCode {
    let outcome = actix_web::rt::System::new().block_on(serve());

    match outcome {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            // The subscriber may not be installed yet when config loading fails.
            let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
            error!(error = %err, "tabviz exited with an error");
            std::process::ExitCode::FAILURE
        }
    }
}
