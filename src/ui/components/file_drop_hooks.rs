use crate::file_drop::DropBatch;
use crate::AppContext;
use dioxus::prelude::*;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Hook that makes this component the drop observer and returns the latest drop.
/// Observers are cleared when the component unmounts.
pub fn use_file_drop() -> Signal<Option<DropBatch>> {
    let app_context = use_context::<AppContext>();
    let mut latest = use_signal(|| None::<DropBatch>);

    let enumerator = app_context.drop_enumerator.clone();
    use_hook(move || {
        let (tx, mut rx) = mpsc::unbounded_channel::<DropBatch>();
        enumerator.set_observers(vec![Arc::new(move |batch: &DropBatch| {
            let _ = tx.send(batch.clone());
        })]);
        spawn(async move {
            while let Some(batch) = rx.recv().await {
                latest.set(Some(batch));
            }
        });
    });

    let enumerator = app_context.drop_enumerator.clone();
    use_drop(move || enumerator.clear_observers());

    latest
}
