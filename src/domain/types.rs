//! Shared domain enumerations for content handed over by the CMS.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of content entity. Anything other than a page is treated as
/// categorized content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Page,
    Article,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Page => "page",
            ContentType::Article => "article",
            ContentType::Other(name) => name.as_str(),
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self, ContentType::Page)
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "page" => ContentType::Page,
            "article" | "post" => ContentType::Article,
            _ => ContentType::Other(value),
        }
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Published,
    Revision,
    Autosave,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Published => "published",
            LifecycleState::Revision => "revision",
            LifecycleState::Autosave => "autosave",
        }
    }

    /// Revisions and autosaves never reach the public site.
    pub fn is_transient(self) -> bool {
        matches!(self, LifecycleState::Revision | LifecycleState::Autosave)
    }
}
