use std::collections::HashMap;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        QueryString {
            items: pairs.into_iter().collect(),
        }
    }

    /// Requested page number, defaulting to 1 for anything missing or
    /// unparseable.
    pub fn get_page(&self) -> u32 {
        let Some(val) = self.items.get("page") else {
            return 1;
        };
        match val.parse::<u32>() {
            Ok(0) | Err(_) => 1,
            Ok(page) => page,
        }
    }

    pub fn get_tag(&self) -> Option<String> {
        self.items
            .get("tag")
            .filter(|tag| !tag.is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_page() {
        assert_eq!(QueryString::from("page=3").get_page(), 3);
        assert_eq!(QueryString::from("page=0").get_page(), 1);
        assert_eq!(QueryString::from("page=banana").get_page(), 1);
        assert_eq!(QueryString::from("").get_page(), 1);
    }

    #[test]
    fn test_get_tag() {
        assert_eq!(
            QueryString::from("tag=rust&page=2").get_tag(),
            Some("rust".to_string())
        );
        assert_eq!(QueryString::from("tag=").get_tag(), None);
        assert_eq!(QueryString::from("page=2").get_tag(), None);
    }

    #[test]
    fn test_parse_urlencoded_values() {
        let qs = QueryString::from("tag=caf%C3%A9");
        assert_eq!(qs.get_tag(), Some("café".to_string()));
    }
}
