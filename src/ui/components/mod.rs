pub mod app;
pub mod drop_zone;
pub mod duplicate_dialog;
pub mod duplicate_dialog_context;
pub mod file_drop_hooks;
pub mod gesture_hooks;
pub mod import_panel;

pub use app::App;
pub use drop_zone::DropZone;
pub use duplicate_dialog::DuplicateDialog;
pub use duplicate_dialog_context::{
    DecisionRequest, DialogDecider, DuplicateDialogContext, DuplicateDialogProvider,
};
pub use file_drop_hooks::use_file_drop;
pub use gesture_hooks::{use_gesture, GestureBinding};
pub use import_panel::ImportPanel;
