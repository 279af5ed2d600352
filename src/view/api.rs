use serde::Serialize;

use crate::aggregate::{SectionKind, TocSection};
use crate::authors::Author;
use crate::catalog::{Adjacent, TagCount};
use crate::entry::Entry;
use crate::text_utils::format_date_time;

#[derive(Serialize)]
pub struct PostItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub tags: Vec<String>,
    pub reading_time: String,
    pub href: String,
}

impl PostItem {
    pub fn from_entry(entry: &Entry, reading_time: String) -> PostItem {
        let (date, time) = match entry.effective_date() {
            Some(date_time) => format_date_time(&date_time),
            None => (String::new(), String::new()),
        };

        PostItem {
            id: entry.id.to_string(),
            title: entry.title().to_string(),
            description: entry.description().to_string(),
            date,
            time,
            tags: entry.tags().to_vec(),
            reading_time,
            href: entry.href(),
        }
    }
}

#[derive(Serialize)]
pub struct PostListPage {
    pub page: u32,
    pub page_count: u32,
    pub posts: Vec<PostItem>,
}

#[derive(Serialize)]
pub struct TagItem {
    pub tag: String,
    pub count: u32,
}

impl From<TagCount> for TagItem {
    fn from(value: TagCount) -> Self {
        TagItem {
            tag: value.tag,
            count: value.count,
        }
    }
}

#[derive(Serialize)]
pub struct AuthorItem {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_registered: bool,
}

impl From<Author> for AuthorItem {
    fn from(value: Author) -> Self {
        AuthorItem {
            id: value.id,
            name: value.name,
            avatar: value.avatar,
            is_registered: value.is_registered,
        }
    }
}

#[derive(Serialize)]
pub struct LinkItem {
    pub id: String,
    pub title: String,
    pub href: String,
}

impl From<&Entry> for LinkItem {
    fn from(entry: &Entry) -> Self {
        LinkItem {
            id: entry.id.to_string(),
            title: entry.title().to_string(),
            href: entry.href(),
        }
    }
}

#[derive(Serialize)]
pub struct AdjacentItem {
    pub newer: Option<LinkItem>,
    pub older: Option<LinkItem>,
    pub parent: Option<LinkItem>,
}

impl From<Adjacent<'_>> for AdjacentItem {
    fn from(value: Adjacent<'_>) -> Self {
        AdjacentItem {
            newer: value.newer.map(LinkItem::from),
            older: value.older.map(LinkItem::from),
            parent: value.parent.map(LinkItem::from),
        }
    }
}

#[derive(Serialize)]
pub struct HeadingItem {
    pub slug: String,
    pub text: String,
    pub depth: u8,
    pub is_subpost_title: bool,
}

#[derive(Serialize)]
pub struct SectionItem {
    pub kind: &'static str,
    pub title: String,
    pub subpost_id: Option<String>,
    pub headings: Vec<HeadingItem>,
}

impl From<TocSection> for SectionItem {
    fn from(section: TocSection) -> Self {
        SectionItem {
            kind: match section.kind {
                SectionKind::Parent => "parent",
                SectionKind::Subpost => "subpost",
            },
            title: section.title,
            subpost_id: section.subpost_id.map(|id| id.to_string()),
            headings: section
                .headings
                .into_iter()
                .map(|heading| HeadingItem {
                    slug: heading.slug,
                    text: heading.text,
                    depth: heading.depth,
                    is_subpost_title: heading.is_subpost_title,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct PostMeta {
    pub id: String,
    pub title: String,
    pub href: String,
    pub word_count: usize,
    pub reading_time: String,
    pub authors: Vec<AuthorItem>,
    pub adjacent: AdjacentItem,
    pub toc: Vec<SectionItem>,
}
