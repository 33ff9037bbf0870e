use pointzero::CanvasConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match CanvasConfig::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("Could not load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => CanvasConfig::default(),
    };

    if let Err(e) = pointzero::run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
