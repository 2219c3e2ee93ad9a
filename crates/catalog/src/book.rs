use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A single record in the catalog.
///
/// Two books are the *same work* when their titles and authors match
/// ignoring case; see [`is_same_work`](Self::is_same_work). Removal and
/// lookup go through [`has_id`](Self::has_id) instead. The derived
/// [`PartialEq`] compares all three fields and is only meant for asserting
/// round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Missing or unusable ids decode as `0` (unassigned), which cleanup
    /// renumbers.
    #[serde(default, alias = "Id", deserialize_with = "lenient_id")]
    pub id: u32,
    #[serde(default, alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Author")]
    pub author: String,
}
impl Book {
    pub fn new(id: u32, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { id, title: title.into(), author: author.into() }
    }

    /// Identity comparison.
    pub fn has_id(&self, id: u32) -> bool {
        self.id == id
    }

    /// Duplicate-detection comparison: title and author, ignoring case.
    pub fn is_same_work(&self, title: &str, author: &str) -> bool {
        eq_ignore_case(&self.title, title) && eq_ignore_case(&self.author, author)
    }

    /// Whether the title or author contains `keyword`, ignoring case.
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword) || self.author.to_lowercase().contains(&keyword)
    }

    /// Records with either field blank are dropped during cleanup.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() || self.author.trim().is_empty()
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{}] 《{}》|{}", self.id, self.title, self.author)
    }
}

/// Hand-edited files may carry negative, fractional, oversized or quoted ids.
/// None of them should make the whole catalog unreadable.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let id = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64().and_then(|id| u32::try_from(id).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(id.unwrap_or(0))
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
