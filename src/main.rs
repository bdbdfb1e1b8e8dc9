use dioxus::prelude::*;
use intake::channel::InMemoryChannel;
use intake::config::Config;
use intake::duplicate::DuplicateCoordinator;
use intake::file_drop::{DropEnumerator, LocalFileSystem};
use intake::ui::{make_config, App, WebviewDropHost};
use intake::{logging, AppContext};
use std::sync::Arc;
use tracing::info;

fn main() {
    let config = Config::load();
    logging::init(&config);
    info!("Starting intake");

    // Services run here; the UI runs on the desktop event loop
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let runtime_handle = runtime.handle().clone();

    // The worker transport plugs in here; in-process until a worker is attached
    let channel = InMemoryChannel::new(runtime_handle.clone());
    let coordinator = DuplicateCoordinator::attach(Arc::new(channel), runtime_handle.clone());

    let drop_enumerator = DropEnumerator::new(Arc::new(LocalFileSystem));
    let drop_host = Arc::new(WebviewDropHost::default());
    if config.enable_file_drop {
        drop_enumerator.wire(drop_host.as_ref(), &runtime_handle);
    } else {
        info!("File drop disabled by configuration");
    }

    let app_context = AppContext {
        config: config.clone(),
        coordinator,
        drop_enumerator,
        drop_host,
        launcher: None,
        runtime_handle,
    };

    LaunchBuilder::desktop()
        .with_cfg(make_config(&config))
        .with_context(app_context)
        .launch(App);

    drop(runtime);
}
