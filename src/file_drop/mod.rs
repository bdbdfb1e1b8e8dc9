// # File Drop
//
// Turns a native drop (pointer position + absolute paths) into
// `DroppedEntry` values and hands them to the registered observers.
//
// - **FileSystemProbe**: metadata and directory listing queries (`LocalFileSystem`)
// - **DropEnumerator**: resolves paths, one level of children per directory
// - **DropHost**: the environment that delivers native drops; wired once

mod entry;
mod enumerator;
mod host;
mod probe;

pub use entry::{DroppedEntry, FileInfo};
pub use enumerator::{DropBatch, DropEnumerator, DropEvent, DropObserver};
pub use host::{DropHost, DropSink, DropSupport};
pub use probe::{DirListing, DropError, FileSystemProbe, LocalFileSystem};
