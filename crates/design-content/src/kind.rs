//! Content kinds and file types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kinds of content the fetcher serves, each with its own key prefix and
/// source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Ad banner for a slot size.
    Ad,
    /// Analytics tracking snippet.
    Analytics,
    /// Site-wide custom CSS or JS.
    CustomCode,
    /// List of static CSS or JS files.
    StaticFiles,
    /// Installed languages.
    Languages,
}

impl ContentKind {
    /// All kinds.
    pub const ALL: [ContentKind; 5] = [
        Self::Ad,
        Self::Analytics,
        Self::CustomCode,
        Self::StaticFiles,
        Self::Languages,
    ];

    /// Prefix of every cache key for this kind.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Ad => "ads",
            Self::Analytics => "analyticsApi",
            Self::CustomCode => "customCode",
            Self::StaticFiles => "files",
            Self::Languages => "languages",
        }
    }

    /// Unprefixed name of the table this kind is read from.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Ad => "Ads",
            Self::Analytics => "AnalyticsApi",
            Self::CustomCode => "CustomCode",
            Self::StaticFiles => "StaticFiles",
            Self::Languages => "LanguagesInfo",
        }
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ad => "ad",
            Self::Analytics => "analytics",
            Self::CustomCode => "custom_code",
            Self::StaticFiles => "static_files",
            Self::Languages => "languages",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Asset type of custom code and static files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Stylesheet.
    Css,
    /// Script.
    Js,
}

impl FileType {
    /// Value stored in the `codeType` / `fileType` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Js => "js",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown file type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown file type: {0}")]
pub struct UnknownFileType(pub String);

impl FromStr for FileType {
    type Err = UnknownFileType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "css" => Ok(Self::Css),
            "js" => Ok(Self::Js),
            _ => Err(UnknownFileType(s.to_string())),
        }
    }
}
