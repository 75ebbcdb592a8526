//! Product List - keyed lazy column of cards
//!
//! Eight product cards, each a centred column with a circular image and two
//! single-line, ellipsised texts. Items are keyed by index so each card is
//! its own recomposition scope.
//!
//! Run with: cargo run --example product_list
//! Quit with Ctrl+C.

use spark_compose::prelude::*;
use spark_compose::HostError;
use tracing_subscriber::EnvFilter;

fn product_card(ui: &mut Ui, index: usize) -> ViewResult {
    ui.column(Stack::default().centered(), Modifier::new().width(24), |ui| {
        ui.image(
            ImageStyle {
                glyph: '█',
                color: Rgba::MAGENTA,
                shape: ImageShape::Circle,
                outline: Some(Rgba::RED),
            },
            Modifier::new().size(8, 4),
        );
        ui.styled_text(
            format!("Product Name {}", index + 1),
            TextStyle::bold().single_line_ellipsis(),
            Modifier::new(),
        );
        ui.styled_text(
            "Product Description, long enough to be cut off",
            TextStyle::default().color(Rgba::GRAY).single_line_ellipsis(),
            Modifier::new(),
        );
        Ok(())
    })
}

fn home_screen(ui: &mut Ui) -> ViewResult {
    ui.lazy_column(
        0..8usize,
        |index| *index,
        Stack::spaced_by(1).centered(),
        Modifier::new().fill_max_width(1.0),
        |ui, index| product_card(ui, *index),
    )
}

fn main() -> Result<(), HostError> {
    if std::env::var_os("SPARK_COMPOSE_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_env("SPARK_COMPOSE_LOG"))
            .with_writer(std::io::stderr)
            .init();
    }

    let mut handle = mount(home_screen, TerminalSurface::new(), HostConfig::from_env())?;
    handle.run()?;
    handle.unmount()
}
