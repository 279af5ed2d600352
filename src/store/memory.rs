use std::io;

use crate::entry::{CollectionKind, Entry};
use crate::store::ContentStore;

/// In-memory content store. Used by embedders that assemble entries
/// programmatically and by test fixtures; insertion order is the store
/// order queries fall back to for tie-breaking.
#[derive(Default)]
pub struct MemoryStore {
    entries: Vec<Entry>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore { entries: vec![] }
    }

    pub fn with_entries(entries: Vec<Entry>) -> MemoryStore {
        MemoryStore { entries }
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }
}

impl ContentStore for MemoryStore {
    fn entries(&self, kind: CollectionKind) -> io::Result<Vec<Entry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::{EntryData, EntryId, MediaData};

    use super::*;

    fn media_entry(id: &str) -> Entry {
        Entry {
            id: EntryId::new(id),
            kind: CollectionKind::Media,
            data: EntryData::Media(MediaData {
                title: id.to_string(),
                description: "".to_string(),
                date: None,
            }),
            body: String::new(),
        }
    }

    #[test]
    fn test_filters_by_kind_preserving_order() {
        let mut store = MemoryStore::new();
        store.push(media_entry("b"));
        store.push(media_entry("a"));

        let media = store.entries(CollectionKind::Media).unwrap();
        assert_eq!(media.len(), 2);
        assert_eq!(media[0].id, EntryId::new("b"));
        assert_eq!(media[1].id, EntryId::new("a"));

        assert!(store.entries(CollectionKind::Blog).unwrap().is_empty());
    }
}
