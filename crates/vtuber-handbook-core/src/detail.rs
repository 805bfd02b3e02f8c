//! Detail page aggregation.
//!
//! Builds the display structure for one entity from its `character` and
//! `ext_links` rows.
//!
//! # Algorithm
//!
//! 1. Drop fields whose value is empty or absent.
//! 2. Sort the remaining keys (A→Z when ascending, Z→A otherwise).
//! 3. Render each value with an [`InlineRenderer`] and relabel its key
//!    (`real_name` → `Real Name`).
//! 4. Fields whose rendered markup is shorter than the long-content
//!    threshold go to the front section, the rest to the back section.
//!    Both keep sorted order; front is displayed first.
//!
//! The split is measured on rendered markup, in characters.

use serde::Serialize;

use crate::error::Result;
use crate::models::{DetailRecord, ExternalLinksRecord};
use crate::store::CatalogStore;

pub const DEFAULT_LONG_CONTENT_THRESHOLD: usize = 450;

/// Converts raw field text into inline markup.
pub trait InlineRenderer: Send + Sync {
    fn render_inline(&self, raw: &str) -> String;
}

/// Renders text unchanged.
pub struct PlainRenderer;

impl InlineRenderer for PlainRenderer {
    fn render_inline(&self, raw: &str) -> String {
        raw.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: String,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailSections {
    pub front: Vec<DetailField>,
    pub back: Vec<DetailField>,
}

impl DetailSections {
    /// Front rows followed by back rows.
    pub fn rows(&self) -> impl Iterator<Item = &DetailField> {
        self.front.iter().chain(self.back.iter())
    }

    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice of rows shown on `page` (zero-based).
    pub fn page(&self, page: usize, per_page: usize) -> Page<'_> {
        let rows: Vec<&DetailField> = self.rows().collect();
        Page::new(rows, page, per_page)
    }
}

/// Everything the detail screen needs for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailPage {
    pub name: String,
    pub sections: DetailSections,
    pub links: Option<ExternalLinksRecord>,
}

/// Aggregation settings.
#[derive(Debug, Clone, Copy)]
pub struct DetailOptions {
    pub sort_ascending: bool,
    pub long_content_threshold: usize,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            sort_ascending: false,
            long_content_threshold: DEFAULT_LONG_CONTENT_THRESHOLD,
        }
    }
}

/// Fetch and aggregate the detail page for `name`.
pub async fn aggregate<S: CatalogStore + ?Sized>(
    store: &S,
    name: &str,
    options: DetailOptions,
    renderer: &dyn InlineRenderer,
) -> Result<DetailPage> {
    let (detail, links) = store.get_detail_and_links(name).await?;
    Ok(DetailPage {
        name: name.to_string(),
        sections: aggregate_fields(detail.as_ref(), options, renderer),
        links,
    })
}

/// Split a detail record into front and back sections.
pub fn aggregate_fields(
    detail: Option<&DetailRecord>,
    options: DetailOptions,
    renderer: &dyn InlineRenderer,
) -> DetailSections {
    let Some(detail) = detail else {
        return DetailSections::default();
    };

    let mut fields: Vec<(&str, &str)> = detail.present_fields().collect();
    if options.sort_ascending {
        fields.sort_by(|a, b| a.0.cmp(b.0));
    } else {
        fields.sort_by(|a, b| b.0.cmp(a.0));
    }

    let mut sections = DetailSections::default();
    for (key, value) in fields {
        let html = renderer.render_inline(value);
        let long = html.chars().count() >= options.long_content_threshold;
        let field = DetailField {
            label: untokenize_key(key),
            html,
        };
        if long {
            sections.back.push(field);
        } else {
            sections.front.push(field);
        }
    }
    sections
}

/// `affiliation_group` → `Affiliation Group`.
pub fn untokenize_key(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// One page of detail rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub rows: Vec<&'a DetailField>,
    /// Zero-based index of the first row on this page.
    pub from: usize,
    /// Exclusive end index.
    pub to: usize,
    pub total: usize,
    pub page_count: usize,
}

impl<'a> Page<'a> {
    fn new(all: Vec<&'a DetailField>, page: usize, per_page: usize) -> Self {
        let total = all.len();
        let per_page = per_page.max(1);
        let from = page.saturating_mul(per_page).min(total);
        let to = page.saturating_add(1).saturating_mul(per_page).min(total);
        Self {
            rows: all[from..to].to_vec(),
            from,
            to,
            total,
            page_count: total.div_ceil(per_page),
        }
    }

    /// `"6-10 of 12"`.
    pub fn label(&self) -> String {
        format!("{}-{} of {}", self.from + 1, self.to, self.total)
    }
}
