use std::collections::{BTreeMap, HashMap};
use std::io;
use std::io::ErrorKind;
use std::thread;
use std::thread::ScopedJoinHandle;

use chrono::{DateTime, Datelike, NaiveDateTime};

use crate::entry::{CollectionKind, Entry, EntryId};
use crate::store::ContentStore;

/// Immutable snapshot of all collections, materialized once per query
/// invocation. Every operation below is deterministic for a given
/// snapshot: sorts are stable, so store order is the tie-break.
pub struct Catalog {
    blog: Vec<Entry>,
    coding: Vec<Entry>,
    media: Vec<Entry>,
    authors: Vec<Entry>,
}

/// Navigation neighbors of an entry. Direction follows each sequence's
/// own natural order: within a subpost chapter sequence (ascending)
/// `newer` is the next chapter, within the top-level feed (descending)
/// `newer` is the more recent post.
#[derive(Debug)]
pub struct Adjacent<'a> {
    pub newer: Option<&'a Entry>,
    pub older: Option<&'a Entry>,
    pub parent: Option<&'a Entry>,
}

impl<'a> Adjacent<'a> {
    fn none() -> Adjacent<'a> {
        Adjacent {
            newer: None,
            older: None,
            parent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

fn effective_or_epoch(entry: &Entry) -> NaiveDateTime {
    entry
        .effective_date()
        .unwrap_or_else(|| DateTime::UNIX_EPOCH.naive_utc())
}

impl Catalog {
    /// Fetches the four collections, one thread each. The fetches are
    /// independent reads; the scope is the wait-for-all barrier, and the
    /// first store failure is propagated.
    pub fn load<S: ContentStore + Sync>(store: &S) -> io::Result<Catalog> {
        let (blog, coding, media, authors) = thread::scope(|scope| {
            let blog = scope.spawn(|| store.entries(CollectionKind::Blog));
            let coding = scope.spawn(|| store.entries(CollectionKind::Coding));
            let media = scope.spawn(|| store.entries(CollectionKind::Media));
            let authors = scope.spawn(|| store.entries(CollectionKind::Authors));
            (join(blog), join(coding), join(media), join(authors))
        });

        Ok(Catalog {
            blog: blog?,
            coding: coding?,
            media: media?,
            authors: authors?,
        })
    }

    /// Top-level, non-draft blog posts, most recent first.
    pub fn blog_posts(&self) -> Vec<&Entry> {
        let mut posts: Vec<&Entry> = self
            .blog
            .iter()
            .filter(|post| !post.draft() && !post.id.is_subpost())
            .collect();
        posts.sort_by(|a, b| effective_or_epoch(b).cmp(&effective_or_epoch(a)));
        posts
    }

    /// Non-draft blog entries including subposts, most recent first.
    /// Used for id lookup, not display.
    pub fn blog_posts_with_subposts(&self) -> Vec<&Entry> {
        let mut posts: Vec<&Entry> = self.blog.iter().filter(|post| !post.draft()).collect();
        posts.sort_by(|a, b| effective_or_epoch(b).cmp(&effective_or_epoch(a)));
        posts
    }

    /// Blog posts, coding projects and media albums interleaved
    /// chronologically, most recent first. Undated entries sink to the
    /// end via the epoch fallback.
    pub fn all_content(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self
            .blog
            .iter()
            .filter(|post| !post.draft() && !post.id.is_subpost())
            .chain(self.coding.iter())
            .chain(self.media.iter())
            .collect();
        entries.sort_by(|a, b| effective_or_epoch(b).cmp(&effective_or_epoch(a)));
        entries
    }

    /// Coding projects, most recently started first; projects without
    /// a start date sink to the end.
    pub fn coding_projects(&self) -> Vec<&Entry> {
        let mut projects: Vec<&Entry> = self.coding.iter().collect();
        projects.sort_by(|a, b| effective_or_epoch(b).cmp(&effective_or_epoch(a)));
        projects
    }

    /// Non-draft subposts of the given parent, in chapter order:
    /// ascending `(date, order)`, the inverse of the top-level feed.
    pub fn subposts_of(&self, parent_id: &EntryId) -> Vec<&Entry> {
        let mut subposts: Vec<&Entry> = self
            .blog
            .iter()
            .filter(|post| {
                !post.draft() && post.id.parent().as_ref() == Some(parent_id)
            })
            .collect();
        subposts.sort_by(|a, b| {
            effective_or_epoch(a)
                .cmp(&effective_or_epoch(b))
                .then(a.order().cmp(&b.order()))
        });
        subposts
    }

    pub fn has_subposts(&self, parent_id: &EntryId) -> bool {
        self.subpost_count(parent_id) > 0
    }

    pub fn subpost_count(&self, parent_id: &EntryId) -> usize {
        self.subposts_of(parent_id).len()
    }

    /// Any non-draft blog entry, top-level or subpost.
    pub fn post_by_id(&self, id: &EntryId) -> Option<&Entry> {
        self.blog
            .iter()
            .find(|post| !post.draft() && &post.id == id)
    }

    pub fn author_by_id(&self, id: &str) -> Option<&Entry> {
        self.authors.iter().find(|author| author.id.as_str() == id)
    }

    /// Previous/next navigation for an entry, all-`None` when the id is
    /// not found in its sequence.
    pub fn adjacent(&self, id: &EntryId) -> Adjacent<'_> {
        if let Some(parent_id) = id.parent() {
            let parent = self
                .blog_posts()
                .into_iter()
                .find(|post| post.id == parent_id);

            let siblings = self.subposts_of(&parent_id);
            let Some(index) = siblings.iter().position(|post| &post.id == id) else {
                return Adjacent::none();
            };

            return Adjacent {
                newer: siblings.get(index + 1).copied(),
                older: if index > 0 {
                    siblings.get(index - 1).copied()
                } else {
                    None
                },
                parent,
            };
        }

        let posts = self.blog_posts();
        let Some(index) = posts.iter().position(|post| &post.id == id) else {
            return Adjacent::none();
        };

        Adjacent {
            newer: if index > 0 {
                posts.get(index - 1).copied()
            } else {
                None
            },
            older: posts.get(index + 1).copied(),
            parent: None,
        }
    }

    /// Tag -> occurrence count over the top-level non-draft posts.
    /// Rebuilt on every call; the collection is small and build-time only.
    pub fn tag_counts(&self) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for post in self.blog_posts() {
            for tag in post.tags() {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Tags by descending count, ties broken lexicographically.
    pub fn sorted_tags(&self) -> Vec<TagCount> {
        let mut tags: Vec<TagCount> = self
            .tag_counts()
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        tags
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<&Entry> {
        self.blog_posts()
            .into_iter()
            .filter(|post| post.tags().iter().any(|t| t == tag))
            .collect()
    }

    pub fn posts_by_author(&self, author_id: &str) -> Vec<&Entry> {
        self.blog_posts()
            .into_iter()
            .filter(|post| post.authors().iter().any(|a| a == author_id))
            .collect()
    }

    pub fn recent_posts(&self, count: usize) -> Vec<&Entry> {
        let mut posts = self.blog_posts();
        posts.truncate(count);
        posts
    }
}

/// Groups entries by the 4-digit year of their effective date,
/// preserving input order within each group.
pub fn group_by_year<'a>(entries: &[&'a Entry]) -> BTreeMap<String, Vec<&'a Entry>> {
    let mut groups: BTreeMap<String, Vec<&Entry>> = BTreeMap::new();
    for entry in entries {
        let year = format!("{:04}", effective_or_epoch(entry).year());
        groups.entry(year).or_default().push(entry);
    }
    groups
}

fn join(handle: ScopedJoinHandle<'_, io::Result<Vec<Entry>>>) -> io::Result<Vec<Entry>> {
    match handle.join() {
        Ok(entries) => entries,
        Err(_) => Err(io::Error::new(
            ErrorKind::Other,
            "Collection fetch thread panicked",
        )),
    }
}
