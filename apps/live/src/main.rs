use tracing::{error, info};

#[tokio::main]
async fn main() {
	let path = config::config_path_from_env();
	let config = match config::AppConfig::load(&path) {
		Ok(config) => config,
		Err(err) => {
			resonix::init_logging("INFO");
			error!(path = %path.display(), error = %err, "failed to load config");
			std::process::exit(2);
		}
	};
	resonix::init_logging(&config.log.level);
	info!(path = %path.display(), instruments = config.stocks.len(), "config loaded");

	if let Err(err) = runtime::run_live(config).await {
		error!(error = %err, "live runtime stopped");
		std::process::exit(1);
	}
}
