/// Turns backend image references into loadable URLs.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    asset_base: String,
    placeholder: String,
}

const ABSOLUTE_PREFIXES: [&str; 5] = ["http://", "https://", "//", "data:", "blob:"];

impl ImageResolver {
    pub fn new(asset_base: &str, placeholder: &str) -> Self {
        Self {
            asset_base: asset_base.trim_end_matches('/').to_string(),
            placeholder: placeholder.to_string(),
        }
    }

    /// Absolute URLs pass through, relative ones get the asset base, and
    /// anything missing or blank becomes the placeholder.
    pub fn resolve(&self, raw: Option<&str>) -> String {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return self.placeholder.clone(),
        };

        let absolute = ABSOLUTE_PREFIXES.iter().any(|prefix| {
            raw.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        });
        if absolute {
            return raw.to_string();
        }

        format!("{}/{}", self.asset_base, raw.trim_start_matches('/'))
    }
}
