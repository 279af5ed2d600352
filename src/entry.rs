use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;

/// Separator used in compound identifiers. An id of the form
/// `parent/child` denotes a subpost nested under the top-level
/// entry `parent`. Exactly one level of nesting is modeled.
pub const ID_SEPARATOR: char = '/';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Blog,
    Coding,
    Media,
    Authors,
}

impl CollectionKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            CollectionKind::Blog => "blog",
            CollectionKind::Coding => "coding",
            CollectionKind::Media => "media",
            CollectionKind::Authors => "authors",
        }
    }
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> EntryId {
        EntryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_subpost(&self) -> bool {
        self.0.contains(ID_SEPARATOR)
    }

    /// Parent id of a subpost. `None` for a top-level id, so callers
    /// don't need a separate `is_subpost` guard.
    pub fn parent(&self) -> Option<EntryId> {
        let (parent, _) = self.0.split_once(ID_SEPARATOR)?;
        Some(EntryId(parent.to_string()))
    }

    /// Last path segment: the id itself for a top-level entry, the
    /// child part for a subpost.
    pub fn local(&self) -> &str {
        match self.0.split_once(ID_SEPARATOR) {
            Some((_, local)) => local,
            None => self.0.as_str(),
        }
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// "Has an effective timestamp". Collection kinds name their date field
/// differently (`date` vs `start_date`); the cross-kind chronological
/// merge depends only on this capability.
pub trait Dated {
    fn effective_date(&self) -> Option<NaiveDateTime>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogData {
    pub title: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub order: Option<i32>,
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodingData {
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDateTime>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaData {
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorData {
    pub name: String,
    pub avatar: Option<String>,
}

impl Dated for BlogData {
    fn effective_date(&self) -> Option<NaiveDateTime> {
        Some(self.date)
    }
}

impl Dated for CodingData {
    fn effective_date(&self) -> Option<NaiveDateTime> {
        self.start_date
    }
}

impl Dated for MediaData {
    fn effective_date(&self) -> Option<NaiveDateTime> {
        self.date
    }
}

impl Dated for AuthorData {
    fn effective_date(&self) -> Option<NaiveDateTime> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    Blog(BlogData),
    Coding(CodingData),
    Media(MediaData),
    Author(AuthorData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub kind: CollectionKind,
    pub data: EntryData,
    pub body: String,
}

impl Entry {
    pub fn title(&self) -> &str {
        match &self.data {
            EntryData::Blog(data) => data.title.as_str(),
            EntryData::Coding(data) => data.title.as_str(),
            EntryData::Media(data) => data.title.as_str(),
            EntryData::Author(data) => data.name.as_str(),
        }
    }

    pub fn description(&self) -> &str {
        match &self.data {
            EntryData::Blog(data) => data.description.as_str(),
            EntryData::Coding(data) => data.description.as_str(),
            EntryData::Media(data) => data.description.as_str(),
            EntryData::Author(_) => "",
        }
    }

    pub fn tags(&self) -> &[String] {
        match &self.data {
            EntryData::Blog(data) => data.tags.as_slice(),
            EntryData::Coding(data) => data.tags.as_slice(),
            _ => &[],
        }
    }

    pub fn authors(&self) -> &[String] {
        match &self.data {
            EntryData::Blog(data) => data.authors.as_slice(),
            _ => &[],
        }
    }

    pub fn draft(&self) -> bool {
        match &self.data {
            EntryData::Blog(data) => data.draft,
            _ => false,
        }
    }

    /// Ordering key among sibling subposts, 0 when absent.
    pub fn order(&self) -> i32 {
        match &self.data {
            EntryData::Blog(data) => data.order.unwrap_or(0),
            _ => 0,
        }
    }

    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        match &self.data {
            EntryData::Blog(data) => data.effective_date(),
            EntryData::Coding(data) => data.effective_date(),
            EntryData::Media(data) => data.effective_date(),
            EntryData::Author(data) => data.effective_date(),
        }
    }

    pub fn author(&self) -> Option<&AuthorData> {
        match &self.data {
            EntryData::Author(data) => Some(data),
            _ => None,
        }
    }

    /// Canonical site path for the entry.
    pub fn href(&self) -> String {
        match self.kind {
            CollectionKind::Blog => format!("/blog/{}", self.id),
            CollectionKind::Coding => format!("/projects/{}", self.id),
            CollectionKind::Media => format!("/media/{}", self.id),
            CollectionKind::Authors => format!("/authors/{}", self.id),
        }
    }
}
