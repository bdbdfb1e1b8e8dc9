use crate::ui::components::drop_zone::DropZone;
use crate::ui::components::duplicate_dialog::DuplicateDialog;
use crate::ui::components::duplicate_dialog_context::DuplicateDialogProvider;
use crate::ui::components::import_panel::ImportPanel;
use crate::ui::APP_CSS;
use dioxus::prelude::*;
use tracing::debug;

#[component]
pub fn App() -> Element {
    debug!("Rendering app component");

    rsx! {
        style { "{APP_CSS}" }
        DuplicateDialogProvider {
            DropZone {
                ImportPanel {}
            }
            DuplicateDialog {}
        }
    }
}
