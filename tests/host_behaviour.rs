//! End-to-end behaviour of a mounted tree on a headless surface.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use spark_compose::host::InputEvent;
use spark_compose::prelude::*;
use spark_compose::{HostError, KeyInput, Patch, diff};

fn config(width: u16, height: u16) -> HostConfig {
    HostConfig::default().size(width, height)
}

/// Column and row of the first occurrence of `needle` in frame text.
fn locate(text: &str, needle: &str) -> Option<(u16, u16)> {
    text.lines().enumerate().find_map(|(row, line)| {
        line.find(needle)
            .map(|byte| (line[..byte].chars().count() as u16, row as u16))
    })
}

#[test]
fn one_click_many_writes_one_evaluation() {
    let mut handle = mount(
        |ui| {
            let count = ui.remember(|| 0u32);
            let label = format!("n={}", count.get());
            ui.button(
                move || {
                    for _ in 0..3 {
                        count.update(|n| *n += 1);
                    }
                },
                Modifier::new(),
                |ui| {
                    ui.text(label);
                    Ok(())
                },
            )
        },
        MemorySurface::new(20, 5),
        config(20, 5),
    )
    .unwrap();

    let before = handle.runtime().evaluation_count(handle.root()).unwrap();
    let (x, y) = locate(&handle.surface().text(), "n=0").unwrap();
    assert!(handle.click(x, y).unwrap());

    assert_eq!(handle.runtime().evaluation_count(handle.root()), Some(before + 1));
    assert!(handle.surface().text().contains("n=3"));
    assert_eq!(handle.surface().present_count(), 2);
}

#[test]
fn failed_evaluation_keeps_previous_frame() {
    let switch: Rc<RefCell<Option<State<bool>>>> = Rc::new(RefCell::new(None));
    let slot = switch.clone();
    let mut handle = mount(
        move |ui| {
            let fail = ui.remember(|| false);
            *slot.borrow_mut() = Some(fail.clone());
            if fail.get() {
                return Err(ViewError::failed("refusing to render"));
            }
            ui.text("healthy");
            Ok(())
        },
        MemorySurface::new(20, 3),
        config(20, 3),
    )
    .unwrap();
    let fail = switch.borrow().clone().unwrap();

    fail.set(true);
    let err = handle.recompose().unwrap_err();
    assert!(matches!(err, HostError::Recompose(_)));
    assert!(handle.tree().contains_text("healthy"));
    assert_eq!(handle.surface().text(), "healthy");
    assert_eq!(handle.surface().present_count(), 1);

    // The event loop logs and keeps going.
    assert!(handle.tick().unwrap());
    assert!(handle.runtime().has_pending());

    fail.set(false);
    handle.recompose().unwrap();
    assert!(!handle.runtime().has_pending());
    assert_eq!(handle.surface().text(), "healthy");
}

#[test]
fn list_item_state_follows_keys() {
    let order: Rc<RefCell<Option<State<Vec<String>>>>> = Rc::new(RefCell::new(None));
    let slot = order.clone();
    let mut handle = mount(
        move |ui| {
            let names = ui.remember(|| vec!["a".to_string(), "b".to_string(), "c".to_string()]);
            *slot.borrow_mut() = Some(names.clone());
            let items: Vec<(usize, String)> = names.get().into_iter().enumerate().collect();
            ui.lazy_column(
                items,
                |(_, name): &(usize, String)| name.clone(),
                Stack::default(),
                Modifier::new(),
                |ui, (index, name): &(usize, String)| {
                    let first_index = ui.remember(|| *index);
                    ui.text(format!("{name}:{}", first_index.get()));
                    Ok(())
                },
            )
        },
        MemorySurface::new(10, 5),
        config(10, 5),
    )
    .unwrap();
    assert_eq!(handle.surface().text(), "a:0\nb:1\nc:2");

    let names = order.borrow().clone().unwrap();
    names.update(|names| names.reverse());
    assert!(handle.recompose().unwrap());
    assert_eq!(handle.tree().texts(), vec!["c:2", "b:1", "a:0"]);
    assert_eq!(handle.surface().text(), "c:2\nb:1\na:0");

    names.update(|names| names.retain(|name| name != "b"));
    handle.recompose().unwrap();
    assert_eq!(handle.surface().text(), "c:2\na:0");
}

#[test]
fn keyed_scope_losing_a_node_repaints() {
    let switch: Rc<RefCell<Option<State<bool>>>> = Rc::new(RefCell::new(None));
    let slot = switch.clone();
    let mut handle = mount(
        move |ui| {
            let show_extra = ui.remember(|| true);
            *slot.borrow_mut() = Some(show_extra.clone());
            ui.keyed("item", move |ui| {
                if show_extra.get() {
                    ui.text("first");
                }
                ui.text("second");
                Ok(())
            })
        },
        MemorySurface::new(10, 5),
        config(10, 5),
    )
    .unwrap();
    assert_eq!(handle.surface().text(), "first\nsecond");

    switch.borrow().clone().unwrap().set(false);
    assert!(handle.recompose().unwrap());
    assert_eq!(handle.tree().texts(), vec!["second"]);
    assert_eq!(handle.surface().text(), "second");
    assert_eq!(handle.surface().present_count(), 2);

    switch.borrow().clone().unwrap().set(true);
    handle.recompose().unwrap();
    assert_eq!(handle.surface().text(), "first\nsecond");
}

#[test]
fn list_item_growing_and_shrinking_repaints() {
    let order: Rc<RefCell<Option<State<Vec<String>>>>> = Rc::new(RefCell::new(None));
    let expander: Rc<RefCell<Option<State<bool>>>> = Rc::new(RefCell::new(None));
    let (names_slot, expanded_slot) = (order.clone(), expander.clone());
    let mut handle = mount(
        move |ui| {
            let names = ui.remember(|| vec!["a".to_string(), "b".to_string(), "c".to_string()]);
            *names_slot.borrow_mut() = Some(names.clone());
            let expanded_slot = expanded_slot.clone();
            ui.lazy_column(
                names.get(),
                |name: &String| name.clone(),
                Stack::default(),
                Modifier::new(),
                move |ui, name: &String| {
                    let expanded = ui.remember(|| false);
                    if name == "b" {
                        *expanded_slot.borrow_mut() = Some(expanded.clone());
                    }
                    ui.text(name.clone());
                    if expanded.get() {
                        ui.text(format!("{name} details"));
                    }
                    Ok(())
                },
            )
        },
        MemorySurface::new(12, 6),
        config(12, 6),
    )
    .unwrap();
    assert_eq!(handle.surface().text(), "a\nb\nc");
    let expanded = expander.borrow().clone().unwrap();

    expanded.set(true);
    assert!(handle.recompose().unwrap());
    assert_eq!(handle.surface().text(), "a\nb\nb details\nc");

    expanded.set(false);
    assert!(handle.recompose().unwrap());
    assert_eq!(handle.surface().text(), "a\nb\nc");

    // Dropping an item that currently spans two nodes.
    expanded.set(true);
    handle.recompose().unwrap();
    let names = order.borrow().clone().unwrap();
    names.update(|names| names.retain(|name| name != "b"));
    assert!(handle.recompose().unwrap());
    assert_eq!(handle.tree().texts(), vec!["a", "c"]);
    assert_eq!(handle.surface().text(), "a\nc");
}

fn dialog_app(ui: &mut Ui) -> ViewResult {
    let open = ui.remember(|| true);
    let confirmed = ui.remember(|| false);
    ui.text(format!("confirmed={}", confirmed.get()));
    if open.get() {
        let dismiss = open.clone();
        let close = open.clone();
        ui.alert_dialog(
            AlertDialog::new("Delete it?", move || dismiss.set(false))
                .title("Confirm")
                .confirm(DialogButton::new("OK", move || {
                    confirmed.set(true);
                    close.set(false);
                })),
        )?;
    }
    Ok(())
}

#[test]
fn click_outside_dialog_dismisses() {
    let mut handle = mount(dialog_app, MemorySurface::new(40, 20), config(40, 20)).unwrap();
    assert!(handle.surface().text().contains("Delete it?"));

    assert!(handle.click(0, 0).unwrap());
    assert!(handle.frame().topmost_dialog().is_none());
    let text = handle.surface().text();
    assert!(!text.contains("Delete it?"));
    assert!(text.contains("confirmed=false"));
}

#[test]
fn dialog_button_click_runs_its_handler() {
    let mut handle = mount(dialog_app, MemorySurface::new(40, 20), config(40, 20)).unwrap();
    let (x, y) = locate(&handle.surface().text(), "OK").unwrap();

    assert!(handle.click(x, y).unwrap());
    let text = handle.surface().text();
    assert!(text.contains("confirmed=true"));
    assert!(!text.contains("Delete it?"));
}

#[test]
fn scripted_escape_dismisses_dialog() {
    let mut handle = mount(dialog_app, MemorySurface::new(40, 20), config(40, 20)).unwrap();
    handle.surface_mut().push_input(InputEvent::Key(KeyInput::esc()));
    handle.surface_mut().push_input(InputEvent::Key(KeyInput::ctrl('c')));

    handle.run().unwrap();
    assert!(!handle.is_running());
    assert!(!handle.surface().text().contains("Delete it?"));
    assert!(handle.surface().text().contains("confirmed=false"));
}

#[test]
fn inline_frame_fits_content() {
    let handle = mount(
        |ui| {
            ui.column(Stack::default(), Modifier::new(), |ui| {
                ui.text("one");
                ui.text("two");
                Ok(())
            })
        },
        MemorySurface::new(20, 10),
        config(20, 10).render_mode(RenderMode::Inline),
    )
    .unwrap();

    assert_eq!(handle.frame().height(), 2);
    assert_eq!(handle.surface().text(), "one\ntwo");
}

#[test]
fn single_text_change_is_one_update() {
    let switch: Rc<RefCell<Option<State<u32>>>> = Rc::new(RefCell::new(None));
    let slot = switch.clone();
    let handle = mount(
        move |ui| {
            let middle = ui.remember(|| 1u32);
            *slot.borrow_mut() = Some(middle.clone());
            let label = format!("b{}", middle.get());
            ui.column(Stack::default(), Modifier::new(), |ui| {
                ui.text("a");
                ui.text(label);
                ui.text("c");
                Ok(())
            })
        },
        MemorySurface::new(10, 5),
        config(10, 5),
    )
    .unwrap();

    let runtime = handle.runtime().clone();
    let root = handle.root();
    let before = runtime.resolve(root);
    assert!(diff(&before, &runtime.resolve(root)).is_empty());

    switch.borrow().clone().unwrap().set(2);
    runtime.recompose(16).unwrap();
    let after = runtime.resolve(root);

    let patches = diff(&before, &after);
    assert_eq!(patches.len(), 1);
    match &patches[0] {
        Patch::Update { node, .. } => assert_eq!(node.text(), Some("b2")),
        other => panic!("expected an update, got {other:?}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn clicks_count_exactly(clicks in 0usize..12) {
        let mut handle = mount(
            |ui| {
                let count = ui.remember(|| 0usize);
                let label = format!("n={}", count.get());
                ui.button(move || count.update(|n| *n += 1), Modifier::new(), |ui| {
                    ui.text(label);
                    Ok(())
                })
            },
            MemorySurface::new(20, 5),
            config(20, 5),
        )
        .unwrap();

        for _ in 0..clicks {
            prop_assert!(handle.click(1, 1).unwrap());
        }
        let expected = format!("n={clicks}");
        prop_assert!(handle.surface().text().contains(&expected));
        prop_assert_eq!(handle.surface().present_count(), clicks + 1);
    }
}
