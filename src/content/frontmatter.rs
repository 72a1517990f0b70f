//! Frontmatter detection and parsing.
//!
//! Posts may start with YAML-like (`---`) or TOML (`+++`) frontmatter.
//! TOML goes through serde; the YAML-like form is a line-oriented
//! `key: value` parse covering the fields real content files use, without
//! pulling in a full YAML implementation.

use anyhow::Result;

use super::meta::PostMeta;

/// Extract frontmatter and return `(metadata, body)`.
///
/// Returns `None` when the source has no frontmatter block; the caller
/// then treats the whole source as body with default metadata.
pub fn extract(content: &str) -> Result<Option<(PostMeta, &str)>> {
    match detect(content) {
        Some((fm, body, is_toml)) => {
            let meta = if is_toml {
                parse_toml(fm)?
            } else {
                parse_yaml_like(fm)
            };
            Ok(Some((meta, body)))
        }
        None => Ok(None),
    }
}

/// Detect and extract frontmatter.
/// Returns `(frontmatter, body, is_toml)` if found.
fn detect(content: &str) -> Option<(&str, &str, bool)> {
    let trimmed = content.trim_start();

    // YAML: ---...---
    if trimmed.starts_with("---")
        && let Some(end) = trimmed[3..].find("\n---")
    {
        let fm = trimmed[3..3 + end].trim();
        let body = trimmed[3 + end + 4..].trim_start_matches('\n');
        return Some((fm, body, false));
    }

    // TOML: +++...+++
    if trimmed.starts_with("+++")
        && let Some(end) = trimmed[3..].find("\n+++")
    {
        let fm = trimmed[3..3 + end].trim();
        let body = trimmed[3 + end + 4..].trim_start_matches('\n');
        return Some((fm, body, true));
    }

    None
}

fn parse_toml(content: &str) -> Result<PostMeta> {
    toml::from_str(content).map_err(|e| anyhow::anyhow!("Invalid TOML frontmatter: {}", e))
}

/// Parse simple YAML-like frontmatter (key: value).
///
/// Supports standard fields (title, tags, etc.) and custom fields in `extra`.
fn parse_yaml_like(content: &str) -> PostMeta {
    let mut meta = PostMeta::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            let key_norm = key.trim().to_lowercase().replace(['-', '_'], "");
            let value = strip_quotes(value.trim());

            match key_norm.as_str() {
                "title" => meta.title = Some(value.to_string()),
                "description" => meta.description = Some(value.to_string()),
                "publishedat" => meta.published_at = Some(value.to_string()),
                "updatedat" => meta.updated_at = Some(value.to_string()),
                "draft" => meta.draft = value.eq_ignore_ascii_case("true"),
                "tags" => meta.tags = parse_tag_list(value),
                _ => {
                    meta.extra
                        .insert(key.trim().to_string(), parse_scalar(value));
                }
            }
        }
    }

    meta
}

/// Parse a tag list: `[a, b]` or bare `a, b`.
fn parse_tag_list(value: &str) -> Vec<String> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    inner
        .split(',')
        .map(|s| strip_quotes(s.trim()).to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a YAML-like scalar value into JSON: bool, integer, float or string.
fn parse_scalar(value: &str) -> serde_json::Value {
    match value {
        "true" => return serde_json::Value::Bool(true),
        "false" => return serde_json::Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = value.parse::<i64>() {
        return serde_json::Value::Number(n.into());
    }
    if let Ok(f) = value.parse::<f64>()
        && let Some(n) = serde_json::Number::from_f64(f)
    {
        return serde_json::Value::Number(n);
    }
    serde_json::Value::String(value.to_string())
}

/// Strip a single level of matching quotes.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
