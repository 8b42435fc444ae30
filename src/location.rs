use reqwest::Url;
use std::fmt;
use std::str::FromStr;

/// Origin used to turn bare paths into parseable URLs
const LOCAL_ORIGIN: &str = "http://storefront.local";

pub const CATEGORY_PARAM: &str = "category";
pub const SEARCH_PARAM: &str = "search";

/// Page URL as the storefront sees it: path, query string and hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Accepts absolute URLs and site-relative paths like `/products?category=3`.
    pub fn parse(raw: &str) -> Option<Self> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(_) => Url::parse(LOCAL_ORIGIN).ok()?.join(raw).ok()?,
        };
        Some(Self { url })
    }

    /// First non-empty value for `key`.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.into_owned())
    }

    /// Copy with `key` set to `value`, or removed when `value` is None or
    /// empty. Other parameters keep their order.
    pub fn with_query_param(&self, key: &str, value: Option<&str>) -> Self {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(k, _)| k != key)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let value = value.filter(|v| !v.is_empty());

        let mut url = self.url.clone();
        if kept.is_empty() && value.is_none() {
            url.set_query(None);
        } else {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (k, v) in &kept {
                pairs.append_pair(k, v);
            }
            if let Some(v) = value {
                pairs.append_pair(key, v);
            }
        }
        Self { url }
    }

    /// In-page section named by the hash fragment.
    pub fn section(&self) -> Option<Section> {
        self.url.fragment().and_then(|f| f.parse().ok())
    }

    /// Path plus query and fragment, as shown in the address bar.
    pub fn path_and_query(&self) -> String {
        let mut out = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = self.url.fragment() {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_and_query())
    }
}

/// Scroll targets on the shop preview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Products,
    Events,
    Reviews,
    About,
    Contact,
}

impl Section {
    pub fn anchor(&self) -> &'static str {
        match self {
            Section::Products => "products",
            Section::Events => "events",
            Section::Reviews => "reviews",
            Section::About => "about",
            Section::Contact => "contact",
        }
    }
}

impl FromStr for Section {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('#').to_ascii_lowercase().as_str() {
            "products" => Ok(Section::Products),
            "events" => Ok(Section::Events),
            "reviews" => Ok(Section::Reviews),
            "about" => Ok(Section::About),
            "contact" => Ok(Section::Contact),
            _ => Err(()),
        }
    }
}

/// Where the catalog writes its URL updates.
pub trait Navigator {
    fn current(&self) -> &Location;

    /// Swap the current entry without growing history.
    fn replace(&mut self, location: Location);
}

/// In-memory history stack, used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
}

impl MemoryHistory {
    pub fn new(start: Location) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Navigator for MemoryHistory {
    fn current(&self) -> &Location {
        // Never empty: constructed with one entry and only ever replaced
        &self.entries[self.entries.len() - 1]
    }

    fn replace(&mut self, location: Location) {
        if let Some(last) = self.entries.last_mut() {
            *last = location;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative_path() {
        let loc = Location::parse("/products?category=7&search=la").unwrap();
        assert_eq!(loc.query_param(CATEGORY_PARAM).as_deref(), Some("7"));
        assert_eq!(loc.query_param(SEARCH_PARAM).as_deref(), Some("la"));
        assert_eq!(loc.path_and_query(), "/products?category=7&search=la");
    }

    #[test]
    fn test_empty_param_reads_as_none() {
        let loc = Location::parse("/products?category=").unwrap();
        assert_eq!(loc.query_param(CATEGORY_PARAM), None);
    }

    #[test]
    fn test_with_query_param_sets_and_removes() {
        let loc = Location::parse("/products?search=la").unwrap();

        let with = loc.with_query_param(CATEGORY_PARAM, Some("home & garden"));
        assert_eq!(with.query_param(CATEGORY_PARAM).as_deref(), Some("home & garden"));
        assert_eq!(with.query_param(SEARCH_PARAM).as_deref(), Some("la"));

        let without = with.with_query_param(CATEGORY_PARAM, None);
        assert_eq!(without.path_and_query(), "/products?search=la");

        let bare = without.with_query_param(SEARCH_PARAM, Some(""));
        assert_eq!(bare.path_and_query(), "/products");
    }

    #[test]
    fn test_section_from_hash() {
        let loc = Location::parse("/shop/preview/abc#events").unwrap();
        assert_eq!(loc.section(), Some(Section::Events));
        assert_eq!(Location::parse("/shop#nowhere").unwrap().section(), None);
        assert_eq!("#About".parse::<Section>(), Ok(Section::About));
        assert_eq!(Section::Contact.anchor(), "contact");
    }

    #[test]
    fn test_history_replace_does_not_grow() {
        let mut history = MemoryHistory::new(Location::parse("/products").unwrap());
        history.replace(Location::parse("/products?category=1").unwrap());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().path_and_query(), "/products?category=1");

        history.replace(Location::parse("/products").unwrap());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().path_and_query(), "/products");
    }
}
