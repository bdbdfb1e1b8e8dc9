use crate::duplicate::Decision;
use crate::ui::components::duplicate_dialog_context::DuplicateDialogContext;
use crate::ui::components::gesture_hooks::{pointer_position, use_gesture};
use dioxus::prelude::*;

/// Modal asking how to resolve the conflict at the head of the queue.
/// Draggable by its title bar; the position carries over between conflicts.
#[component]
pub fn DuplicateDialog() -> Element {
    let dialog = use_context::<DuplicateDialogContext>();
    let gesture = use_gesture();

    let Some(info) = dialog.current() else {
        return rsx! {};
    };

    let state = *gesture.state.read();
    let transform = format!(
        "transform: translate({}px, {}px);",
        state.offset.x, state.offset.y
    );
    let title_class = if state.active {
        "dialog-title dragging"
    } else {
        "dialog-title"
    };

    let location = match (&info.file_name, info.row) {
        (Some(file), Some(row)) => Some(format!("{} (row {})", file, row)),
        (Some(file), None) => Some(file.clone()),
        (None, Some(row)) => Some(format!("Row {}", row)),
        (None, None) => None,
    };

    let gesture_for_press = gesture.clone();
    let gesture_for_move = gesture.clone();
    let gesture_for_release = gesture.clone();
    let dialog_for_replace = dialog.clone();
    let dialog_for_skip = dialog.clone();
    let dialog_for_cancel = dialog.clone();

    rsx! {
        div {
            class: "overlay",
            onmousemove: move |evt| gesture_for_move.move_to(pointer_position(&evt)),
            onmouseup: move |_| gesture_for_release.release(),
            div {
                class: "dialog",
                style: "{transform}",
                div {
                    class: "{title_class}",
                    onmousedown: move |evt| {
                        evt.prevent_default();
                        gesture_for_press.press(pointer_position(&evt));
                    },
                    "Duplicate data"
                }
                div { class: "dialog-body",
                    p { "{info.message}" }
                    if let Some(location) = location {
                        p { class: "muted", "{location}" }
                    }
                }
                div { class: "dialog-actions",
                    button {
                        class: "btn",
                        onclick: move |_| dialog_for_skip.resolve(Decision::Skip),
                        "Skip"
                    }
                    button {
                        class: "btn danger",
                        onclick: move |_| dialog_for_cancel.resolve(Decision::Cancel),
                        "Cancel import"
                    }
                    button {
                        class: "btn primary",
                        onclick: move |_| dialog_for_replace.resolve(Decision::Replace),
                        "Replace"
                    }
                }
            }
        }
    }
}
