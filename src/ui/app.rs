use crate::config::Config;
use dioxus::desktop::{Config as DioxusConfig, WindowBuilder};

pub const APP_CSS: &str = r#"
body { margin: 0; font-family: -apple-system, "Segoe UI", sans-serif; background: #111827; color: #e5e7eb; }
.drop-zone { min-height: 100vh; box-sizing: border-box; padding: 24px; border: 2px dashed transparent; }
.drop-zone.hovering { border-color: #3b82f6; background: #1e293b; }
.entry { display: flex; justify-content: space-between; padding: 6px 10px; border-bottom: 1px solid #1f2937; }
.entry .children { color: #9ca3af; font-size: 12px; padding-left: 16px; }
.muted { color: #9ca3af; }
.btn { padding: 8px 16px; border-radius: 6px; border: none; color: white; cursor: pointer; background: #374151; }
.btn:hover { background: #4b5563; }
.btn.primary { background: #2563eb; }
.btn.danger { background: #dc2626; }
.btn:disabled { opacity: 0.5; cursor: default; }
.overlay { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.5); display: flex; align-items: center; justify-content: center; z-index: 3000; }
.dialog { background: #1f2937; border-radius: 8px; width: 420px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.4); }
.dialog-title { padding: 12px 16px; font-weight: 600; cursor: move; user-select: none; border-bottom: 1px solid #374151; }
.dialog-title.dragging { cursor: grabbing; }
.dialog-body { padding: 16px; }
.dialog-actions { display: flex; gap: 8px; justify-content: flex-end; padding: 0 16px 16px; }
"#;

pub fn make_config(config: &Config) -> DioxusConfig {
    DioxusConfig::default().with_window(make_window(config))
}

fn make_window(config: &Config) -> WindowBuilder {
    WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_always_on_top(false)
        .with_inner_size(dioxus::desktop::LogicalSize::new(960, 640))
}
