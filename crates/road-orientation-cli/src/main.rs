use road_orientation_cli::{Settings, run};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_cli();
    if let Err(e) = run(&settings) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
