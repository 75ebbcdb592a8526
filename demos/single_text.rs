//! Single Text - one centred line of text
//!
//! The smallest possible app: a column filling the screen, centring a
//! single text node on both axes.
//!
//! Run with: cargo run --example single_text
//! Quit with Ctrl+C. Set `SPARK_COMPOSE_LOG=debug` to log to stderr.

use spark_compose::prelude::*;
use spark_compose::HostError;
use tracing_subscriber::EnvFilter;

fn simple_text(ui: &mut Ui, display: &str) {
    ui.text(display);
}

fn app(ui: &mut Ui) -> ViewResult {
    ui.column(
        Stack::new(Arrangement::Center, Alignment::Center),
        Modifier::new().fill_max_size(),
        |ui| {
            simple_text(ui, "This is a compose tutorial");
            Ok(())
        },
    )
}

fn main() -> Result<(), HostError> {
    if std::env::var_os("SPARK_COMPOSE_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_env("SPARK_COMPOSE_LOG"))
            .with_writer(std::io::stderr)
            .init();
    }

    let mut handle = mount(app, TerminalSurface::new(), HostConfig::from_env())?;
    handle.run()?;
    handle.unmount()
}
