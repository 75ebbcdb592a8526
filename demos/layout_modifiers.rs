//! Layout Modifiers - padding, offset and aspect ratio
//!
//! Four surfaces stacked vertically:
//! - uniform padding around the text
//! - different padding on each edge
//! - an offset that moves the surface without changing its layout size
//! - a fixed 16:9 aspect ratio with top padding
//!
//! Run with: cargo run --example layout_modifiers
//! Quit with Ctrl+C.

use spark_compose::prelude::*;
use spark_compose::HostError;
use tracing_subscriber::EnvFilter;

fn same_padding(ui: &mut Ui) -> ViewResult {
    ui.surface(Rgba::LIGHT_GRAY, Modifier::new(), |ui| {
        ui.styled_text(
            "Text with 2 cells of padding on every side",
            TextStyle::default().color(Rgba::BLACK),
            Modifier::new().padding(2),
        );
        Ok(())
    })
}

fn custom_padding(ui: &mut Ui) -> ViewResult {
    ui.surface(Rgba::CYAN, Modifier::new(), |ui| {
        ui.styled_text(
            "This text has 8 start, 2 top, 1 end and 0 bottom padding",
            TextStyle::default().color(Rgba::BLACK),
            Modifier::new().padding_each(8, 2, 1, 0),
        );
        Ok(())
    })
}

fn offset(ui: &mut Ui) -> ViewResult {
    ui.surface(Rgba::GREEN, Modifier::new().offset(4, 1), |ui| {
        ui.styled_text(
            "Offset moves the surface; its layout keeps its size.",
            TextStyle::default().color(Rgba::BLACK),
            Modifier::new(),
        );
        Ok(())
    })
}

fn aspect_ratio(ui: &mut Ui) -> ViewResult {
    ui.surface(
        Rgba::LIGHT_GRAY,
        Modifier::new()
            .width(32)
            .aspect_ratio(16.0 / 9.0)
            .padding_each(0, 1, 0, 0),
        |ui| {
            ui.styled_text(
                "Wrapped in a fixed 16:9 aspect ratio",
                TextStyle::default().color(Rgba::BLACK).attrs(Attr::ITALIC),
                Modifier::new().padding(1),
            );
            Ok(())
        },
    )
}

fn app(ui: &mut Ui) -> ViewResult {
    ui.column(Stack::spaced_by(1), Modifier::new().fill_max_size(), |ui| {
        ui.boxed(
            Alignment::Start,
            Modifier::new().height(3).fill_max_width(1.0).background(Rgba::BLUE),
            |_| Ok(()),
        )?;
        same_padding(ui)?;
        custom_padding(ui)?;
        offset(ui)?;
        aspect_ratio(ui)
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
