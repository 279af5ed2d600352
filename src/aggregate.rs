use std::io;

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::Catalog;
use crate::entry::EntryId;
use crate::store::ContentStore;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Parent,
    Subpost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TocHeading {
    pub slug: String,
    pub text: String,
    pub depth: u8,
    pub is_subpost_title: bool,
}

/// One group of headings in the flattened navigation list of a
/// multi-document article: the parent's own outline ("Overview") or
/// the outline of one subpost.
#[derive(Debug, Clone, PartialEq)]
pub struct TocSection {
    pub kind: SectionKind,
    pub title: String,
    pub headings: Vec<TocHeading>,
    pub subpost_id: Option<EntryId>,
}

/// Words in a body, markup stripped first so tags don't count.
pub fn word_count(body: &str) -> usize {
    lazy_static! {
        static ref MARKUP: Regex = Regex::new(r"<[^>]*>").unwrap();
    }
    MARKUP.replace_all(body, " ").split_whitespace().count()
}

/// Human reading-time label. Anything under a minute still reads
/// "1 min read".
pub fn reading_time(words: usize, words_per_minute: u32) -> String {
    let wpm = words_per_minute.max(1) as usize;
    let minutes = (words + wpm - 1) / wpm;
    format!("{} min read", minutes.max(1))
}

/// Word count of the entry plus, for a top-level post, all of its
/// subposts. An unresolvable id counts as 0, not an error.
pub fn combined_word_count(catalog: &Catalog, id: &EntryId) -> usize {
    let Some(post) = catalog.post_by_id(id) else {
        return 0;
    };

    let mut total = word_count(&post.body);
    if !id.is_subpost() {
        for subpost in catalog.subposts_of(id) {
            total += word_count(&subpost.body);
        }
    }
    total
}

pub fn combined_reading_time(catalog: &Catalog, id: &EntryId, words_per_minute: u32) -> String {
    reading_time(combined_word_count(catalog, id), words_per_minute)
}

/// Reading time of the entry's own body only, no aggregation upward
/// or downward.
pub fn post_reading_time(catalog: &Catalog, id: &EntryId, words_per_minute: u32) -> String {
    let words = catalog
        .post_by_id(id)
        .map(|post| word_count(&post.body))
        .unwrap_or(0);
    reading_time(words, words_per_minute)
}

/// Flattened table of contents spanning a parent and its subposts.
/// Resolves the top-level ancestor first (itself when already
/// top-level); a document with an empty outline contributes no
/// section. The first heading of each subpost section doubles as that
/// subpost's title heading.
pub fn toc_sections<S: ContentStore>(
    store: &S,
    catalog: &Catalog,
    id: &EntryId,
) -> io::Result<Vec<TocSection>> {
    let Some(post) = catalog.post_by_id(id) else {
        return Ok(vec![]);
    };

    let parent_id = id.parent().unwrap_or_else(|| id.clone());
    let parent = if id.is_subpost() {
        match catalog.post_by_id(&parent_id) {
            Some(parent) => parent,
            None => return Ok(vec![]),
        }
    } else {
        post
    };

    let mut sections = vec![];

    let rendered = store.render(parent)?;
    if !rendered.headings.is_empty() {
        sections.push(TocSection {
            kind: SectionKind::Parent,
            title: "Overview".to_string(),
            headings: rendered
                .headings
                .into_iter()
                .map(|heading| TocHeading {
                    slug: heading.slug,
                    text: heading.text,
                    depth: heading.depth,
                    is_subpost_title: false,
                })
                .collect(),
            subpost_id: None,
        });
    }

    for subpost in catalog.subposts_of(&parent_id) {
        let rendered = store.render(subpost)?;
        if rendered.headings.is_empty() {
            continue;
        }
        sections.push(TocSection {
            kind: SectionKind::Subpost,
            title: subpost.title().to_string(),
            headings: rendered
                .headings
                .into_iter()
                .enumerate()
                .map(|(index, heading)| TocHeading {
                    slug: heading.slug,
                    text: heading.text,
                    depth: heading.depth,
                    is_subpost_title: index == 0,
                })
                .collect(),
            subpost_id: Some(subpost.id.clone()),
        });
    }

    Ok(sections)
}
