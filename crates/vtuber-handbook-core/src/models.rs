//! Typed records for the three catalog tables.
//!
//! Every row that crosses the store boundary is mapped into one of these
//! types. `name` is the only join key: it is unique in `basic_info` and
//! identifies at most one `character` row and one `ext_links` row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which image column of `basic_info` is meaningful.
///
/// This is a global switch, never per-record data: in [`ImageMode::Embedded`]
/// only `profile_img` is read, in [`ImageMode::Linked`] only
/// `profile_img_link` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    Embedded,
    #[default]
    Linked,
}

impl ImageMode {
    pub fn from_embedded_flag(embedded: bool) -> Self {
        if embedded {
            ImageMode::Embedded
        } else {
            ImageMode::Linked
        }
    }

    pub fn is_embedded(self) -> bool {
        self == ImageMode::Embedded
    }
}

/// The single image reference carried by a [`ProfileRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageRef {
    /// Base64 text of a zlib-compressed image.
    Embedded(String),
    /// External image URL.
    Link(String),
}

impl ImageRef {
    /// Pick the one column the current [`ImageMode`] allows.
    ///
    /// The other column is ignored even when populated.
    pub fn from_columns(
        mode: ImageMode,
        profile_img: Option<String>,
        profile_img_link: Option<String>,
    ) -> Self {
        match mode {
            ImageMode::Embedded => ImageRef::Embedded(profile_img.unwrap_or_default()),
            ImageMode::Linked => ImageRef::Link(profile_img_link.unwrap_or_default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ImageRef::Embedded(s) | ImageRef::Link(s) => s.is_empty(),
        }
    }
}

/// A row of `basic_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    pub name: String,
    pub is_agency: bool,
    pub display_title: String,
    /// Free text, may contain inline markdown.
    pub intro: String,
    /// Attribution text, may contain inline markdown.
    pub credit: String,
    pub image: ImageRef,
}

/// A profile tagged with its position in the name list it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedProfile {
    pub position: usize,
    #[serde(flatten)]
    pub profile: ProfileRecord,
}

/// A row of `character`: labeled free-text fields keyed by column name.
///
/// The `name` column is held separately and is not part of `fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub name: String,
    pub fields: BTreeMap<String, Option<String>>,
}

impl DetailRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.fields.insert(key.into(), value.map(str::to_string));
        self
    }

    /// Fields with a non-empty value.
    pub fn present_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|(k, v)| match v.as_deref() {
            Some(v) if !v.is_empty() => Some((k.as_str(), v)),
            _ => None,
        })
    }

    pub fn affiliation(&self) -> Option<&str> {
        self.fields
            .get("affiliation")
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }
}

/// The fixed vocabulary of `ext_links` columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    OfficialChannel,
    Twitch,
    Twitter,
    OfficialSite,
    Patreon,
    Facebook,
    Instagram,
    Pixiv,
    Booth,
    Marshmallow,
}

impl Platform {
    pub const ALL: [Platform; 10] = [
        Platform::OfficialChannel,
        Platform::Twitch,
        Platform::Twitter,
        Platform::OfficialSite,
        Platform::Patreon,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Pixiv,
        Platform::Booth,
        Platform::Marshmallow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::OfficialChannel => "official_channel",
            Platform::Twitch => "twitch",
            Platform::Twitter => "twitter",
            Platform::OfficialSite => "official_site",
            Platform::Patreon => "patreon",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Pixiv => "pixiv",
            Platform::Booth => "booth",
            Platform::Marshmallow => "marshmallow",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == column)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of `ext_links`. Absent or empty URLs are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExternalLinksRecord {
    pub name: String,
    pub links: BTreeMap<Platform, String>,
}

impl ExternalLinksRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: BTreeMap::new(),
        }
    }

    /// Store `url` under `column` if the column is a known platform and the
    /// URL is non-empty. Returns whether it was kept.
    pub fn insert_column(&mut self, column: &str, url: Option<String>) -> bool {
        match (Platform::from_column(column), url) {
            (Some(platform), Some(url)) if !url.is_empty() => {
                self.links.insert(platform, url);
                true
            }
            _ => false,
        }
    }

    /// Links in display order.
    pub fn ordered(&self) -> impl Iterator<Item = (Platform, &str)> {
        self.links.iter().map(|(p, u)| (*p, u.as_str()))
    }
}
