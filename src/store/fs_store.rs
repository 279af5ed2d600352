use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use lazy_static::lazy_static;
use regex::Regex;

use crate::entry::{
    AuthorData, BlogData, CodingData, CollectionKind, Entry, EntryData, EntryId, MediaData,
};
use crate::store::ContentStore;
use crate::text_utils::parse_date_time;

/// Filesystem content store. Each collection kind lives in its own
/// subdirectory of the content root:
///
/// ```text
/// content/
///   blog/
///     city-lights.md                 -> id "city-lights"
///     rust-pipelines/
///       index.md                     -> id "rust-pipelines"
///       ingest.md                    -> id "rust-pipelines/ingest"
///   coding/ ...
///   media/ ...
///   authors/ ...
/// ```
///
/// Entry metadata is a block of `[KEY]: # (value)` lines at the top of
/// the file, optionally wrapped in an HTML comment. Everything after
/// the block is the body.
///
/// Example of entry file:
/// [TITLE]: # (Rust pipelines)
/// [DATE]: # (2024-03-10 09:30:00.000)
/// [TAGS]: # (rust data)
/// [AUTHORS]: # (mark)
pub struct FsStore {
    content_dir: PathBuf,
}

const PARENT_FILE: &str = "index.md";

impl FsStore {
    pub fn new(content_dir: impl Into<PathBuf>) -> FsStore {
        FsStore {
            content_dir: content_dir.into(),
        }
    }

    fn scan_kind(&self, kind: CollectionKind) -> io::Result<Vec<(EntryId, PathBuf)>> {
        let dir = self.content_dir.join(kind.dir_name());
        if !dir.is_dir() {
            // An absent collection directory is an empty collection,
            // not a store failure
            return Ok(vec![]);
        }

        let mut found = vec![];
        for dir_entry in fs::read_dir(&dir)? {
            let dir_entry = dir_entry?;
            let file_type = dir_entry.file_type()?;
            let path = dir_entry.path();

            if file_type.is_file() {
                if let Some(stem) = markdown_stem(&path) {
                    found.push((EntryId::new(stem), path));
                }
            } else if file_type.is_dir() {
                Self::scan_nested(&path, &mut found)?;
            }
        }

        // read_dir order is platform-dependent; the store order queries
        // fall back to must be stable across builds
        found.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
        Ok(found)
    }

    fn scan_nested(dir: &Path, found: &mut Vec<(EntryId, PathBuf)>) -> io::Result<()> {
        let Some(parent) = dir.file_name().and_then(|name| name.to_str()) else {
            return Ok(());
        };

        for dir_entry in fs::read_dir(dir)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            let path = dir_entry.path();
            let Some(stem) = markdown_stem(&path) else {
                continue;
            };

            let file_name = dir_entry.file_name();
            if file_name.to_str() == Some(PARENT_FILE) {
                found.push((EntryId::new(parent), path));
            } else {
                found.push((EntryId::new(format!("{}/{}", parent, stem)), path));
            }
        }

        Ok(())
    }

    fn load_entry(kind: CollectionKind, id: EntryId, path: &Path) -> io::Result<Entry> {
        let raw = fs::read_to_string(path)?;
        parse_entry(kind, id, &raw).map_err(|e| {
            io::Error::new(
                ErrorKind::InvalidData,
                format!("{} - file={}", e, path.display()),
            )
        })
    }
}

impl ContentStore for FsStore {
    fn entries(&self, kind: CollectionKind) -> io::Result<Vec<Entry>> {
        let mut entries = vec![];
        for (id, path) in self.scan_kind(kind)? {
            entries.push(Self::load_entry(kind, id, &path)?);
        }
        Ok(entries)
    }
}

fn markdown_stem(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".md")?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Parses one entry file: the metadata block, then the body.
pub fn parse_entry(kind: CollectionKind, id: EntryId, raw: &str) -> Result<Entry, String> {
    let (fields, body) = split_header(raw)?;
    let data = match kind {
        CollectionKind::Blog => EntryData::Blog(BlogData {
            title: field(&fields, "TITLE"),
            description: field(&fields, "DESCRIPTION"),
            date: parse_date_time(
                fields
                    .get("DATE")
                    .ok_or_else(|| "Missing DATE header".to_string())?,
            )?,
            tags: split_list(fields.get("TAGS")),
            authors: split_list(fields.get("AUTHORS")),
            order: parse_order(fields.get("ORDER"))?,
            draft: parse_flag(fields.get("DRAFT")),
        }),
        CollectionKind::Coding => EntryData::Coding(CodingData {
            title: field(&fields, "TITLE"),
            description: field(&fields, "DESCRIPTION"),
            start_date: parse_opt_date(fields.get("START_DATE"))?,
            tags: split_list(fields.get("TAGS")),
        }),
        CollectionKind::Media => EntryData::Media(MediaData {
            title: field(&fields, "TITLE"),
            description: field(&fields, "DESCRIPTION"),
            date: parse_opt_date(fields.get("DATE"))?,
        }),
        CollectionKind::Authors => EntryData::Author(AuthorData {
            name: fields
                .get("NAME")
                .cloned()
                .unwrap_or_else(|| id.as_str().to_string()),
            avatar: fields.get("AVATAR").cloned(),
        }),
    };

    Ok(Entry {
        id,
        kind,
        data,
        body,
    })
}

fn field(fields: &HashMap<String, String>, key: &str) -> String {
    fields.get(key).cloned().unwrap_or_default()
}

fn split_list(value: Option<&String>) -> Vec<String> {
    match value {
        None => vec![],
        Some(list) => list
            .split_whitespace()
            .map(|item| item.to_string())
            .collect(),
    }
}

fn parse_flag(value: Option<&String>) -> bool {
    match value {
        None => false,
        Some(flag) => flag.eq_ignore_ascii_case("true") || flag == "1",
    }
}

fn parse_order(value: Option<&String>) -> Result<Option<i32>, String> {
    match value {
        None => Ok(None),
        Some(order) => order
            .parse::<i32>()
            .map(Some)
            .map_err(|_| format!("Invalid ORDER header: {}", order)),
    }
}

fn parse_opt_date(value: Option<&String>) -> Result<Option<chrono::NaiveDateTime>, String> {
    match value {
        None => Ok(None),
        Some(date) => parse_date_time(date).map(Some),
    }
}

/// Splits the metadata block from the body. The block is a run of
/// `[KEY]: # (value)` lines, optionally wrapped in `<!--` / `-->`.
fn split_header(raw: &str) -> Result<(HashMap<String, String>, String), String> {
    let mut fields = HashMap::new();
    let mut lines = raw.lines();
    let mut maybe_line = lines.next();

    // Skip leading blank lines, note an opening comment marker
    let mut start_with_comment = false;
    while let Some(line) = maybe_line {
        let line = line.trim();
        if line.is_empty() {
            maybe_line = lines.next();
            continue;
        }
        if line == "<!--" {
            start_with_comment = true;
            maybe_line = lines.next();
        }
        break;
    }

    while let Some(line) = maybe_line {
        if line.trim().is_empty() {
            maybe_line = lines.next();
            continue;
        }
        let Some((key, val)) = extract_header_field(line) else {
            break;
        };
        fields.insert(key.to_string(), val.to_string());
        maybe_line = lines.next();
    }

    if start_with_comment {
        loop {
            let Some(line) = maybe_line else {
                return Err("End of comment in the header is missing".to_string());
            };
            maybe_line = lines.next();
            if line.trim() == "-->" {
                break;
            }
        }
    }

    let mut body = String::new();
    // A single blank separator line after the header is not body content
    if let Some(line) = maybe_line {
        if !line.trim().is_empty() {
            body.push_str(line);
            body.push('\n');
        }
    }
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }

    Ok((fields, body))
}

fn extract_header_field(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref HEADER_REGEX: Regex =
            Regex::new(r"\[(?P<key>\w+)\]: # \((?P<value>.+)\)").unwrap();
    }

    HEADER_REGEX.captures(line).and_then(|cap| {
        let key = cap.name("key").map(|key| key.as_str());
        let val = cap.name("value").map(|val| val.as_str());
        match (key, val) {
            (Some(key), Some(val)) => Some((key, val)),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::test_data::{AUTHOR_ENTRY, BLOG_ENTRY, COMMENT_WRAPPED_ENTRY};

    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, mn: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            NaiveTime::from_hms_opt(h, mn, 0).unwrap(),
        )
    }

    #[test]
    fn test_extract_header_field() {
        let res = extract_header_field("[TITLE]: # (Rust pipelines)");
        assert_eq!(res, Some(("TITLE", "Rust pipelines")));
        let res = extract_header_field("[DATE]: # (2024-03-10 09:30:00.000)");
        assert_eq!(res, Some(("DATE", "2024-03-10 09:30:00.000")));

        let res = extract_header_field("[TITLE]: (missing the marker)");
        assert!(res.is_none());
    }

    #[test]
    fn test_parse_blog_entry() {
        let entry = parse_entry(
            CollectionKind::Blog,
            EntryId::new("rust-pipelines"),
            BLOG_ENTRY,
        )
        .unwrap();

        let EntryData::Blog(ref data) = entry.data else {
            panic!("expected blog payload");
        };
        assert_eq!(data.title, "Rust pipelines");
        assert_eq!(data.description, "Building a data pipeline in Rust");
        assert_eq!(data.date, dt(2024, 3, 10, 9, 30));
        assert_eq!(data.tags, ["rust", "data"]);
        assert_eq!(data.authors, ["mark"]);
        assert_eq!(data.order, None);
        assert!(!data.draft);
        assert!(entry.body.starts_with("An overview of the series."));
    }

    #[test]
    fn test_parse_comment_wrapped_header() {
        let entry = parse_entry(
            CollectionKind::Blog,
            EntryId::new("rust-pipelines/ingest"),
            COMMENT_WRAPPED_ENTRY,
        )
        .unwrap();

        let EntryData::Blog(ref data) = entry.data else {
            panic!("expected blog payload");
        };
        assert_eq!(data.order, Some(1));
        assert!(data.draft);
        assert!(entry.body.contains("## Reading the source"));
    }

    #[test]
    fn test_parse_author_entry() {
        let entry = parse_entry(CollectionKind::Authors, EntryId::new("mark"), AUTHOR_ENTRY).unwrap();
        let EntryData::Author(ref data) = entry.data else {
            panic!("expected author payload");
        };
        assert_eq!(data.name, "Mark");
        assert_eq!(data.avatar.as_deref(), Some("/public/mark.png"));
    }

    #[test]
    fn test_author_name_falls_back_to_id() {
        let entry = parse_entry(CollectionKind::Authors, EntryId::new("ghost-99"), "\n").unwrap();
        let EntryData::Author(ref data) = entry.data else {
            panic!("expected author payload");
        };
        assert_eq!(data.name, "ghost-99");
        assert_eq!(data.avatar, None);
    }

    #[test]
    fn test_missing_date_is_an_error() {
        let res = parse_entry(
            CollectionKind::Blog,
            EntryId::new("x"),
            "[TITLE]: # (No date)\n\nbody\n",
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_unterminated_comment_is_an_error() {
        let res = parse_entry(
            CollectionKind::Blog,
            EntryId::new("x"),
            "<!--\n[DATE]: # (2024-01-01)\n",
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_coding_start_date_optional() {
        let entry = parse_entry(
            CollectionKind::Coding,
            EntryId::new("terrain-gen"),
            "[TITLE]: # (Terrain generator)\n\nbody\n",
        )
        .unwrap();
        assert_eq!(entry.effective_date(), None);

        let entry = parse_entry(
            CollectionKind::Coding,
            EntryId::new("folio-engine"),
            "[TITLE]: # (folio)\n[START_DATE]: # (2024-01-05)\n\nbody\n",
        )
        .unwrap();
        assert_eq!(entry.effective_date(), Some(dt(2024, 1, 5, 0, 0)));
    }

    #[test]
    fn test_scan_layout() -> io::Result<()> {
        let tmp = tempfile::tempdir()?;
        let blog_dir = tmp.path().join("blog");
        fs::create_dir_all(blog_dir.join("rust-pipelines"))?;

        fs::write(
            blog_dir.join("city-lights.md"),
            "[TITLE]: # (City lights)\n[DATE]: # (2023-07-01)\n\nbody\n",
        )?;
        fs::write(
            blog_dir.join("rust-pipelines").join("index.md"),
            "[TITLE]: # (Rust pipelines)\n[DATE]: # (2024-03-10)\n\nbody\n",
        )?;
        fs::write(
            blog_dir.join("rust-pipelines").join("ingest.md"),
            "[TITLE]: # (Ingest)\n[DATE]: # (2024-03-11)\n\nbody\n",
        )?;
        fs::write(blog_dir.join("notes.txt"), "not an entry")?;

        let store = FsStore::new(tmp.path());
        let entries = store.entries(CollectionKind::Blog)?;

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["city-lights", "rust-pipelines", "rust-pipelines/ingest"]);
        Ok(())
    }

    #[test]
    fn test_absent_collection_dir_is_empty() -> io::Result<()> {
        let tmp = tempfile::tempdir()?;
        let store = FsStore::new(tmp.path());
        assert!(store.entries(CollectionKind::Coding)?.is_empty());
        Ok(())
    }
}
