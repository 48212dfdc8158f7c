use imguizmo_demo::{DemoConfig, DemoError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), DemoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    imguizmo_demo::run(DemoConfig::default())
}
