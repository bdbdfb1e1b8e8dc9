use crate::duplicate::{Decision, ImportOutcome};
use crate::file_drop::DroppedEntry;
use crate::ui::components::duplicate_dialog_context::DuplicateDialogContext;
use crate::ui::components::file_drop_hooks::use_file_drop;
use crate::AppContext;
use dioxus::prelude::*;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
enum ImportStatus {
    Idle,
    Running,
    Finished(ImportOutcome),
    Failed(String),
}

/// Dropped files plus the import trigger
#[component]
pub fn ImportPanel() -> Element {
    let app_context = use_context::<AppContext>();
    let dialog = use_context::<DuplicateDialogContext>();
    let latest_drop = use_file_drop();
    let mut status = use_signal(|| ImportStatus::Idle);

    let entries: Vec<DroppedEntry> = latest_drop
        .read()
        .as_ref()
        .map(|batch| batch.entries.clone())
        .unwrap_or_default();
    let has_launcher = app_context.launcher.is_some();
    let can_import = has_launcher
        && !entries.is_empty()
        && *status.read() != ImportStatus::Running;

    let on_import = {
        let entries = entries.clone();
        move |_: MouseEvent| {
            let Some(launcher) = app_context.launcher.clone() else {
                return;
            };
            let coordinator = app_context.coordinator.clone();
            let decider = dialog.decider.clone();
            let files: Vec<PathBuf> = entries.iter().map(|e| e.info.full_path.clone()).collect();

            status.set(ImportStatus::Running);
            spawn(async move {
                let result = coordinator
                    .start(
                        |id| async move { launcher.launch(id, files).await },
                        decider,
                    )
                    .await;
                match result {
                    Ok(outcome) => {
                        info!(
                            "Import {} finished: ok={} strategy={:?}",
                            outcome.id, outcome.ok, outcome.strategy
                        );
                        status.set(ImportStatus::Finished(outcome));
                    }
                    Err(e) => {
                        error!("Import failed: {}", e);
                        status.set(ImportStatus::Failed(e.to_string()));
                    }
                }
            });
        }
    };

    rsx! {
        div {
            h2 { "Import" }
            if entries.is_empty() {
                p { class: "muted", "Drop spreadsheets or folders anywhere in this window." }
            }
            for entry in entries.iter() {
                EntryRow { entry: entry.clone() }
            }
            div { style: "margin-top: 16px;",
                button {
                    class: "btn primary",
                    disabled: !can_import,
                    onclick: on_import,
                    "Import"
                }
                if !has_launcher {
                    span { class: "muted", style: "margin-left: 12px;", "No import worker connected" }
                }
            }
            StatusLine { status: status.read().clone() }
        }
    }
}

#[component]
fn EntryRow(entry: DroppedEntry) -> Element {
    let summary = if entry.is_directory() {
        format!("{} items", entry.children().len())
    } else {
        format!("{} bytes", entry.info.size)
    };

    rsx! {
        div {
            div { class: "entry",
                span { "{entry.name()}" }
                span { class: "muted", "{summary}" }
            }
            for child in entry.children().iter() {
                div { class: "entry children", "{child.name()}" }
            }
        }
    }
}

#[component]
fn StatusLine(status: ImportStatus) -> Element {
    match status {
        ImportStatus::Idle => rsx! {},
        ImportStatus::Running => rsx! {
            p { class: "muted", "Importing..." }
        },
        ImportStatus::Finished(outcome) => {
            let strategy = match outcome.strategy {
                Decision::None => "no conflicts",
                Decision::Replace => "replaced duplicates",
                Decision::Skip => "skipped duplicates",
                Decision::Cancel => "cancelled on duplicate",
            };
            let error = outcome.error.clone().unwrap_or_default();
            rsx! {
                p {
                    "{outcome.message}: {outcome.success_count} imported, "
                    "{outcome.replace_count} replaced, {outcome.skip_count} skipped ({strategy})"
                }
                if !outcome.ok {
                    p { class: "muted", "{error}" }
                }
            }
        }
        ImportStatus::Failed(message) => rsx! {
            p { class: "muted", "{message}" }
        },
    }
}
