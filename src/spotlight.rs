//! Weekly spotlight post.
//!
//! Pulls the subreddit "hot" listing and picks the first post whose title
//! contains the configured pattern. Titles look like
//! `Weekly VTuber Spotlight: Some Name`; the part before the first `:` is the
//! title and the rest is the subtitle.
//!
//! This is the only network access in the crate and is best-effort: any
//! failure is logged and yields `None`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SpotlightConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spotlight {
    pub title: String,
    pub subtitle: String,
    pub url: String,
    /// Post body as HTML.
    pub body_html: String,
}

impl Spotlight {
    /// Plain-text listing: title, subtitle, url, then the body markup.
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.title.as_str()];
        if !self.subtitle.is_empty() {
            lines.push(&self.subtitle);
        }
        lines.push(&self.url);
        if !self.body_html.is_empty() {
            lines.push("");
            lines.push(&self.body_html);
        }
        lines.join("\n")
    }
}

/// Fetch the current spotlight, or `None` if unavailable.
pub async fn fetch_spotlight(config: &SpotlightConfig) -> Option<Spotlight> {
    match fetch_listing(config).await {
        Ok(listing) => {
            let spotlight = parse_listing(&listing, &config.title_pattern);
            if spotlight.is_none() {
                debug!(pattern = %config.title_pattern, "no spotlight post in listing");
            }
            spotlight
        }
        Err(e) => {
            warn!(error = %e, url = %config.url, "failed to fetch spotlight");
            None
        }
    }
}

async fn fetch_listing(config: &SpotlightConfig) -> Result<serde_json::Value> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("vtdb/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client
        .get(&config.url)
        .header("Accept", "application/json")
        .send()
        .await
        .with_context(|| format!("GET {}", config.url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("listing request failed with {}", status);
    }

    Ok(response.json().await?)
}

/// Pick the spotlight out of a listing document (`data.children[].data`).
pub fn parse_listing(listing: &serde_json::Value, title_pattern: &str) -> Option<Spotlight> {
    let children = listing.get("data")?.get("children")?.as_array()?;

    let post = children
        .iter()
        .filter_map(|child| child.get("data"))
        .find(|post| {
            post.get("title")
                .and_then(|t| t.as_str())
                .is_some_and(|t| t.contains(title_pattern))
        })?;

    let full_title = post.get("title")?.as_str()?;
    let (title, subtitle) = match full_title.split_once(':') {
        Some((title, subtitle)) => (title.trim(), subtitle.trim()),
        None => (full_title.trim(), ""),
    };

    let str_field = |key: &str| {
        post.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    Some(Spotlight {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        url: str_field("url"),
        body_html: unescape_html(&str_field("selftext_html")),
    })
}

/// Undo the entity escaping applied to `selftext_html`.
pub fn unescape_html(text: &str) -> String {
    const ENTITIES: [(&str, &str); 6] = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&#x27;", "'"),
        ("&amp;", "&"),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, replacement)) => {
                out.push_str(replacement);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
