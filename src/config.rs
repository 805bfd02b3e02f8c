//! TOML configuration.
//!
//! Only `[catalog] path` is required; every other table falls back to the
//! defaults below.
//!
//! ```toml
//! [catalog]
//! path = "./data/wiki-data.db"
//!
//! [images]
//! embedded = false
//!
//! [search]
//! distance = 45
//! threshold = 0.4
//! max_results_embedded = 20
//!
//! [detail]
//! long_content_threshold = 450
//! sort_ascending = false
//! items_per_page = 5
//! page_size_options = [3, 5, 10, 50]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use vtuber_handbook_core::detail::DetailOptions;
use vtuber_handbook_core::fuzzy::FuzzyOptions;
use vtuber_handbook_core::models::ImageMode;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub detail: DetailConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub bookmarks: BookmarksConfig,
    #[serde(default)]
    pub spotlight: SpotlightConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImagesConfig {
    /// Read `profile_img` blobs instead of `profile_img_link` URLs.
    #[serde(default)]
    pub embedded: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_distance")]
    pub distance: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_max_results_embedded")]
    pub max_results_embedded: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            threshold: default_threshold(),
            max_results_embedded: default_max_results_embedded(),
        }
    }
}

fn default_distance() -> usize {
    45
}
fn default_threshold() -> f64 {
    0.4
}
fn default_max_results_embedded() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetailConfig {
    #[serde(default = "default_long_content_threshold")]
    pub long_content_threshold: usize,
    #[serde(default)]
    pub sort_ascending: bool,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            long_content_threshold: default_long_content_threshold(),
            sort_ascending: false,
            items_per_page: default_items_per_page(),
            page_size_options: default_page_size_options(),
        }
    }
}

fn default_long_content_threshold() -> usize {
    450
}
fn default_items_per_page() -> usize {
    5
}
fn default_page_size_options() -> Vec<usize> {
    vec![3, 5, 10, 50]
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    #[serde(default = "default_discovery_limit")]
    pub limit: usize,
    #[serde(default = "default_min_cards")]
    pub min_cards: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            limit: default_discovery_limit(),
            min_cards: default_min_cards(),
        }
    }
}

fn default_discovery_limit() -> usize {
    20
}
fn default_min_cards() -> usize {
    6
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookmarksConfig {
    #[serde(default = "default_bookmarks_path")]
    pub path: PathBuf,
    #[serde(default = "default_bookmarks_key")]
    pub key: String,
}

impl Default for BookmarksConfig {
    fn default() -> Self {
        Self {
            path: default_bookmarks_path(),
            key: default_bookmarks_key(),
        }
    }
}

fn default_bookmarks_path() -> PathBuf {
    PathBuf::from("./data/bookmarks.json")
}
fn default_bookmarks_key() -> String {
    "@userdata_bookmark_names".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpotlightConfig {
    #[serde(default = "default_spotlight_url")]
    pub url: String,
    #[serde(default = "default_title_pattern")]
    pub title_pattern: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            url: default_spotlight_url(),
            title_pattern: default_title_pattern(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_spotlight_url() -> String {
    "https://www.reddit.com/r/VirtualYoutubers/hot.json".to_string()
}
fn default_title_pattern() -> String {
    "Weekly VTuber Spotlight".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn image_mode(&self) -> ImageMode {
        ImageMode::from_embedded_flag(self.images.embedded)
    }

    /// Matcher options; the result cap only applies in embedded-image mode.
    pub fn fuzzy_options(&self) -> FuzzyOptions {
        FuzzyOptions {
            distance: self.search.distance,
            threshold: self.search.threshold,
            max_results: self
                .images
                .embedded
                .then_some(self.search.max_results_embedded),
        }
    }

    pub fn detail_options(&self) -> DetailOptions {
        DetailOptions {
            sort_ascending: self.detail.sort_ascending,
            long_content_threshold: self.detail.long_content_threshold,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if !(0.0..=1.0).contains(&config.search.threshold) {
        anyhow::bail!("search.threshold must be in [0.0, 1.0]");
    }

    if config.images.embedded && config.search.max_results_embedded == 0 {
        anyhow::bail!("search.max_results_embedded must be > 0");
    }

    if config.detail.long_content_threshold == 0 {
        anyhow::bail!("detail.long_content_threshold must be > 0");
    }

    if config.detail.page_size_options.contains(&0) {
        anyhow::bail!("detail.page_size_options must all be > 0");
    }

    if !config
        .detail
        .page_size_options
        .contains(&config.detail.items_per_page)
    {
        anyhow::bail!(
            "detail.items_per_page ({}) must be one of {:?}",
            config.detail.items_per_page,
            config.detail.page_size_options
        );
    }

    Ok(config)
}
