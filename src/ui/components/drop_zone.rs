use crate::file_drop::DropEvent;
use crate::gesture::Point;
use crate::AppContext;
use dioxus::html::HasFileData;
use dioxus::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Full-window drop target. Swallows the web view's default drag handling
/// so a dropped file never navigates the window away.
#[component]
pub fn DropZone(children: Element) -> Element {
    let app_context = use_context::<AppContext>();
    let mut hovering = use_signal(|| false);
    let supported = app_context.drop_enumerator.is_supported();

    let drop_host = app_context.drop_host.clone();
    let class = if *hovering.read() {
        "drop-zone hovering"
    } else {
        "drop-zone"
    };

    rsx! {
        div {
            class: "{class}",
            ondragover: move |evt: DragEvent| {
                evt.prevent_default();
                if supported && !*hovering.peek() {
                    hovering.set(true);
                }
            },
            ondragleave: move |_| hovering.set(false),
            ondrop: move |evt: DragEvent| {
                evt.prevent_default();
                hovering.set(false);
                if !supported {
                    debug!("Drop ignored, file drop disabled");
                    return;
                }

                let point = evt.client_coordinates();
                let paths: Vec<PathBuf> = evt.files().iter().map(|file| file.path()).collect();
                if paths.is_empty() {
                    return;
                }
                if !drop_host.forward(DropEvent {
                    position: Point::new(point.x, point.y),
                    paths,
                }) {
                    warn!("Drop could not be delivered to the enumerator");
                }
            },
            {children}
        }
    }
}
