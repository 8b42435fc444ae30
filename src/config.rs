use serde::Deserialize;
use std::{env, fs};
use tracing::info;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub backend: Backend,
    pub storefront: Storefront,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Backend {
    /// Base URL the API paths and relative image URLs hang off
    pub base_url: String,
    /// Prefix for relative image URLs; falls back to the origin of `base_url`
    pub asset_url: Option<String>,
    /// Shown whenever an image URL is missing
    pub placeholder_image: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Storefront {
    pub shop_id: String,
    pub page_size: usize,
    /// Shared clock period
    pub tick_millis: u64,
    pub hide_on_expire: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v2".to_string(),
            asset_url: None,
            placeholder_image: "/placeholder.png".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            shop_id: String::new(),
            page_size: 12,
            tick_millis: 1000,
            hide_on_expire: false,
        }
    }
}

impl Backend {
    /// Where relative image paths are served from.
    pub fn asset_base(&self) -> String {
        if let Some(url) = &self.asset_url {
            return url.clone();
        }
        match reqwest::Url::parse(&self.base_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.base_url.clone(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env();
        Ok(config)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        if config.storefront.page_size == 0 {
            anyhow::bail!("storefront.page_size must be at least 1");
        }
        if config.storefront.tick_millis == 0 {
            anyhow::bail!("storefront.tick_millis must be at least 1");
        }
        Ok(config)
    }

    /// Environment wins over the file.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var("SHOPFRONT_BACKEND_URL") {
            info!("Backend URL overridden from environment: {url}");
            self.backend.base_url = url;
        }
        if let Ok(id) = env::var("SHOPFRONT_SHOP_ID") {
            self.storefront.shop_id = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_when_sections_missing() {
        let config = Config::parse("[general]\nlog_level = \"debug\"\n").unwrap();

        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.storefront.page_size, 12);
        assert_eq!(config.storefront.tick_millis, 1000);
        assert!(!config.storefront.hide_on_expire);
        assert_eq!(config.backend.timeout_secs, 10);
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::parse(
            r#"
            [backend]
            base_url = "https://shop.example.com/api/v2"
            placeholder_image = "https://cdn.example.com/none.png"
            timeout_secs = 3

            [storefront]
            shop_id = "64a1"
            page_size = 24
            tick_millis = 500
            hide_on_expire = true
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://shop.example.com/api/v2");
        assert_eq!(config.storefront.shop_id, "64a1");
        assert_eq!(config.storefront.page_size, 24);
        assert!(config.storefront.hide_on_expire);
    }

    #[test]
    fn test_asset_base_defaults_to_origin() {
        let mut backend = Backend::default();
        assert_eq!(backend.asset_base(), "http://localhost:8000");

        backend.asset_url = Some("https://cdn.example.com".to_string());
        assert_eq!(backend.asset_base(), "https://cdn.example.com");
    }

    #[test]
    fn test_parse_rejects_zero_page_size() {
        assert!(Config::parse("[storefront]\npage_size = 0\n").is_err());
    }
}
