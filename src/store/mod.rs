use std::io;

use crate::entry::{CollectionKind, Entry};
use crate::outline::{render_markdown, Rendered};

pub mod fs_store;
pub mod memory;

/// Backing source of content entries. All queries materialize a snapshot
/// through this trait once per invocation; results must be deterministic
/// for an unchanged source.
///
/// "Not found" is never an error here: an empty collection is a valid
/// result. An `Err` always means the source itself could not be read,
/// which callers must surface rather than treat as "no content".
pub trait ContentStore {
    fn entries(&self, kind: CollectionKind) -> io::Result<Vec<Entry>>;

    /// Heading outline and body markup for one entry.
    fn render(&self, entry: &Entry) -> io::Result<Rendered> {
        render_markdown(&entry.body)
    }
}
