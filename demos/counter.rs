//! Counter - remembered state and event batching
//!
//! The button adds one per click; the "+3" button writes three times in a
//! single handler, which still costs only one re-evaluation. The evaluation
//! count is shown so the batching is visible.
//!
//! Run with: cargo run --example counter
//! Quit with Ctrl+C. `SPARK_COMPOSE_RENDER_MODE=inline` renders below the prompt.

use spark_compose::prelude::*;
use spark_compose::HostError;
use tracing_subscriber::EnvFilter;

fn counter(ui: &mut Ui) -> ViewResult {
    let count = ui.remember(|| 0u32);
    let evaluations = ui.runtime().evaluation_count(ui.scope_id()).unwrap_or(0) + 1;

    ui.column(Stack::spaced_by(1), Modifier::new().padding(1), |ui| {
        ui.styled_text(
            format!("Clicked {} times", count.get()),
            TextStyle::bold(),
            Modifier::new(),
        );
        ui.row(Stack::spaced_by(2), Modifier::new(), |ui| {
            let one = count.clone();
            ui.button(move || one.update(|n| *n += 1), Modifier::new().padding_each(1, 0, 1, 0), |ui| {
                ui.text("+1");
                Ok(())
            })?;
            let three = count.clone();
            ui.button(
                move || {
                    for _ in 0..3 {
                        three.update(|n| *n += 1);
                    }
                },
                Modifier::new().padding_each(1, 0, 1, 0),
                |ui| {
                    ui.text("+3");
                    Ok(())
                },
            )
        })?;
        ui.styled_text(
            format!("evaluation #{evaluations}"),
            TextStyle::default().color(Rgba::GRAY),
            Modifier::new(),
        );
        Ok(())
    })
}

fn main() -> Result<(), HostError> {
    if std::env::var_os("SPARK_COMPOSE_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_env("SPARK_COMPOSE_LOG"))
            .with_writer(std::io::stderr)
            .init();
    }

    let mut handle = mount(counter, TerminalSurface::new(), HostConfig::from_env())?;
    handle.run()?;
    handle.unmount()
}
