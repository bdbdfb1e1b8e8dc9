pub mod app;
pub mod app_context;
pub mod components;
pub mod webview_drop;

pub use app::*;
pub use app_context::{AppContext, ImportLauncher};
pub use components::*;
pub use webview_drop::WebviewDropHost;
