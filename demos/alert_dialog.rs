//! Alert Dialog - state-driven conditional UI
//!
//! Clicking the card sets `show_popup`; the dialog exists only while it is
//! set. The confirm button, a click outside the dialog and Esc all clear it
//! again.
//!
//! Run with: cargo run --example alert_dialog
//! Quit with Ctrl+C.

use spark_compose::prelude::*;
use spark_compose::HostError;
use tracing_subscriber::EnvFilter;

fn clickable_text(ui: &mut Ui) -> ViewResult {
    let show_popup = ui.remember(|| false);

    let open = show_popup.clone();
    ui.column(
        Stack::default(),
        Modifier::new().clickable(move || open.set(true)),
        |ui| {
            ui.card(CardStyle::default(), Modifier::new().padding(1), |ui| {
                ui.styled_text(
                    "Click to open the dialog",
                    TextStyle::default().color(Rgba::BLACK),
                    Modifier::new().padding_each(2, 1, 2, 1),
                );
                Ok(())
            })
        },
    )?;

    if show_popup.get() {
        let dismiss = show_popup.clone();
        let confirm = show_popup.clone();
        ui.alert_dialog(
            AlertDialog::new(
                "Congratulations! The dialog opened after your click.",
                move || dismiss.set(false),
            )
            .confirm(DialogButton::new("OK", move || confirm.set(false))),
        )?;
    }
    Ok(())
}

fn app(ui: &mut Ui) -> ViewResult {
    ui.column(Stack::default(), Modifier::new(), clickable_text)
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
