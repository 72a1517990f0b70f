//! Post metadata from frontmatter.

use serde::{Deserialize, Serialize};

/// Raw JSON object for user-defined frontmatter fields.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Deserialize tags, treating `null` as empty vec
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Post metadata from `---` (YAML-like) or `+++` (TOML) frontmatter.
///
/// # Standard Fields
///
/// | Field          | Type          | Description                     |
/// |----------------|---------------|---------------------------------|
/// | `title`        | `String`      | Post title                      |
/// | `description`  | `String`      | Brief summary for lists/feeds   |
/// | `tags`         | `Vec<String>` | Categorization tags             |
/// | `published-at` | `String`      | Publication date (ISO 8601)     |
/// | `updated-at`   | `String`      | Last update date                |
/// | `draft`        | `bool`        | Draft status (default: false)   |
///
/// CamelCase aliases (`publishedAt`, `updatedAt`) are accepted so existing
/// content collections keep working unchanged.
///
/// # Custom Fields (`extra`)
///
/// Any additional fields are captured in `extra` as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PostMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Tags for categorizing the post.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    /// Publication date, `YYYY-MM-DD` or RFC 3339.
    #[serde(alias = "publishedAt", alias = "published_at")]
    pub published_at: Option<String>,
    /// Last update date.
    #[serde(alias = "updatedAt", alias = "updated_at")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub draft: bool,
    /// Additional user-defined fields (raw JSON).
    #[serde(flatten, default)]
    pub extra: JsonMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_meta_default() {
        let meta = PostMeta::default();
        assert!(meta.title.is_none());
        assert!(!meta.draft);
        assert!(meta.tags.is_empty());
        assert!(meta.published_at.is_none());
    }

    #[test]
    fn test_post_meta_deserialize() {
        let json = r#"{"title": "Hello", "draft": true, "tags": ["rust", "web"]}"#;
        let meta: PostMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert!(meta.draft);
        assert_eq!(meta.tags, vec!["rust", "web"]);
    }

    #[test]
    fn test_post_meta_camel_case_aliases() {
        let json = r#"{"publishedAt": "2024-01-15", "updatedAt": "2024-02-01"}"#;
        let meta: PostMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.published_at.as_deref(), Some("2024-01-15"));
        assert_eq!(meta.updated_at.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_post_meta_extra_fields() {
        let json = r#"{"title": "Test", "custom_field": "value", "number": 42}"#;
        let meta: PostMeta = serde_json::from_str(json).unwrap();
        assert_eq!(
            meta.extra.get("custom_field").and_then(|v| v.as_str()),
            Some("value")
        );
        assert_eq!(meta.extra.get("number").and_then(|v| v.as_i64()), Some(42));
    }

    #[test]
    fn test_post_meta_null_tags() {
        let json = r#"{"tags": null}"#;
        let meta: PostMeta = serde_json::from_str(json).unwrap();
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn test_post_meta_from_toml() {
        let toml = "title = \"Hello\"\ntags = [\"a\", \"b\"]\npublished-at = \"2024-06-15\"";
        let meta: PostMeta = toml::from_str(toml).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.tags, vec!["a", "b"]);
        assert_eq!(meta.published_at.as_deref(), Some("2024-06-15"));
    }
}
