use crate::catalog::Catalog;

/// A display-ready author attribution. Unregistered references keep
/// the raw id as the name so attribution never silently disappears.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_registered: bool,
}

/// Resolves author ids against the authors collection. Every id yields
/// a record: unknown ids fall back to a synthetic one flagged
/// `is_registered = false`, with the placeholder avatar.
pub fn resolve_authors(catalog: &Catalog, ids: &[String], default_avatar: &str) -> Vec<Author> {
    ids.iter()
        .map(|id| {
            let record = catalog.author_by_id(id).and_then(|entry| entry.author());
            match record {
                Some(data) => Author {
                    id: id.clone(),
                    name: data.name.clone(),
                    avatar: data
                        .avatar
                        .clone()
                        .unwrap_or_else(|| default_avatar.to_string()),
                    is_registered: true,
                },
                None => Author {
                    id: id.clone(),
                    name: id.clone(),
                    avatar: default_avatar.to_string(),
                    is_registered: false,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::test_data::fixtures::{author_entry, sample_store};

    use super::*;

    const PLACEHOLDER: &str = "/public/avatar.png";

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_known_and_ghost_authors() {
        let catalog = Catalog::load(&sample_store()).unwrap();
        let authors = resolve_authors(&catalog, &strings(&["mark", "ghost-99"]), PLACEHOLDER);

        assert_eq!(authors.len(), 2);

        assert!(authors[0].is_registered);
        assert_eq!(authors[0].name, "Mark");
        assert_eq!(authors[0].avatar, "/public/mark.png");

        assert!(!authors[1].is_registered);
        assert_eq!(authors[1].id, "ghost-99");
        assert_eq!(authors[1].name, "ghost-99");
        assert_eq!(authors[1].avatar, PLACEHOLDER);
    }

    #[test]
    fn test_registered_author_without_avatar_gets_placeholder() {
        let mut store = sample_store();
        store.push(author_entry("ann", "Ann", None));
        let catalog = Catalog::load(&store).unwrap();

        let authors = resolve_authors(&catalog, &strings(&["ann"]), PLACEHOLDER);
        assert!(authors[0].is_registered);
        assert_eq!(authors[0].avatar, PLACEHOLDER);
    }

    #[test]
    fn test_empty_reference_list() {
        let catalog = Catalog::load(&sample_store()).unwrap();
        assert!(resolve_authors(&catalog, &[], PLACEHOLDER).is_empty());
    }
}
