//! Nested Borders - modifier order matters
//!
//! Each `border` draws over the bounds left by everything before it, and
//! each `padding` pushes everything after it inwards, so alternating the two
//! nests frames. The "Hello" text also carries an offset between its two
//! frames, which shifts the inner frame without growing the layout.
//!
//! Run with: cargo run --example nested_borders
//! Quit with Ctrl+C.

use spark_compose::prelude::*;
use spark_compose::HostError;
use tracing_subscriber::EnvFilter;

fn app(ui: &mut Ui) -> ViewResult {
    let frames = Modifier::new()
        .background(Rgba::GREEN)
        .fill_max_height(0.5)
        .fill_max_width(1.0)
        .border(Rgba::MAGENTA)
        .padding(1)
        .border(Rgba::BLUE)
        .padding(1)
        .border_style(BorderStyle::Double, Rgba::RED)
        .padding(2);

    ui.column(Stack::default(), frames, |ui| {
        ui.styled_text(
            "Hello",
            TextStyle::default().color(Rgba::BLACK),
            Modifier::new()
                .border(Rgba::YELLOW)
                .padding(1)
                .offset(4, 1)
                .border_style(BorderStyle::Bold, Rgba::BLACK)
                .padding(1),
        );
        ui.spacer(Modifier::new().height(3));
        ui.styled_text("World", TextStyle::default().color(Rgba::BLACK), Modifier::new());
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

    let mut handle = mount(app, TerminalSurface::new(), HostConfig::from_env())?;
    handle.run()?;
    handle.unmount()
}
