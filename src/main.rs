use clap::Parser;
use grammate::adapters::GeminiClient;
use grammate::server::{self, AppState};
use grammate::utils::logger;
use grammate::{GrammarChecker, ServerArgs, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let args = ServerArgs::parse();

    logger::init_server_logger(args.verbose, args.log_json);

    tracing::info!("Starting grammate server");
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }

    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("Configuration error: {}", e);
            eprintln!("Set GEMINI_API_KEY (or pass --api-key) before starting the server.");
            std::process::exit(1);
        }
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    let generator = GeminiClient::new(&settings.api_base_url, &settings.model, &settings.api_key);
    tracing::info!("Using provider model: {}", generator.model());
    let state = AppState::new(GrammarChecker::new(generator));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("Server is running on http://{}", listener.local_addr()?);
    server::serve(listener, state).await?;

    Ok(())
}
