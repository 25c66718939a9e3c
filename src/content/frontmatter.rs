//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use thiserror::Error;

/// Front-matter that exists but could not be parsed
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("unterminated front-matter block")]
    Unterminated,

    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => vec![s],
        Value::Sequence(items) => items.into_iter().filter_map(scalar_string).collect(),
        Value::Null => Vec::new(),
        other => scalar_string(other).into_iter().collect(),
    })
}

/// Only a YAML boolean counts; anything else is treated as unset
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// Only a YAML integer counts; anything else is treated as unset
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_i64())
}

/// Non-empty scalar text; numbers and booleans are rendered as written
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_string(Value::deserialize(deserializer)?).filter(|s| !s.is_empty()))
}

fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Metadata block at the top of a course document.
///
/// Known keys are typed; every other key is kept in `extra` in the order
/// it was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub visible: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub preview: Option<bool>,
    #[serde(deserialize_with = "lenient_int")]
    pub order: Option<i64>,
    #[serde(rename = "materialsUrl", deserialize_with = "lenient_string")]
    pub materials_url: Option<String>,
    #[serde(rename = "codeUrl", deserialize_with = "lenient_string")]
    pub code_url: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Split a document into its metadata and body.
    ///
    /// The block must start on the first line with `---` and end at the
    /// next line consisting of `---`. A document without that opening line
    /// has empty metadata and the whole text as body.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let Some(rest) = strip_delimiter_line(content) else {
            return Ok((FrontMatter::default(), content));
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml = &rest[..offset];
                let body = &rest[offset + line.len()..];
                return Ok((Self::from_yaml(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }

    /// Like [`FrontMatter::parse`], but a broken block is logged and the
    /// whole text is kept as body.
    pub fn parse_lenient(content: &str) -> (Self, &str) {
        match Self::parse(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Ignoring front-matter: {}", e);
                (FrontMatter::default(), content)
            }
        }
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// `visible` defaults to true; only an explicit `false` hides
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// `preview` defaults to false; only an explicit `true` marks it
    pub fn is_preview(&self) -> bool {
        self.preview == Some(true)
    }
}

/// Strip an opening `---` line (tolerating a BOM and trailing blanks)
fn strip_delimiter_line(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (first, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };
    (first.trim_end() == "---").then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Variables
description: Storing values
materialsUrl: https://example.com/slides.pdf
tags:
  - basics
  - js
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Variables"));
        assert_eq!(fm.description.as_deref(), Some("Storing values"));
        assert_eq!(
            fm.materials_url.as_deref(),
            Some("https://example.com/slides.pdf")
        );
        assert_eq!(fm.tags, vec!["basics", "js"]);
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Heading\n\nBody text";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = FrontMatter::parse("---\n---\nbody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_crlf_delimiters() {
        let (fm, body) = FrontMatter::parse("---\r\ntitle: Win\r\n---\r\nbody").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Win"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_visible_only_false_hides() {
        let (fm, _) = FrontMatter::parse("---\nvisible: false\n---\n").unwrap();
        assert!(!fm.is_visible());

        let (fm, _) = FrontMatter::parse("---\nvisible: \"false\"\n---\n").unwrap();
        assert!(fm.is_visible());

        let (fm, _) = FrontMatter::parse("---\nvisible: 0\n---\n").unwrap();
        assert!(fm.is_visible());

        assert!(FrontMatter::default().is_visible());
    }

    #[test]
    fn test_preview_only_true_marks() {
        let (fm, _) = FrontMatter::parse("---\npreview: true\n---\n").unwrap();
        assert!(fm.is_preview());

        let (fm, _) = FrontMatter::parse("---\npreview: yes please\n---\n").unwrap();
        assert!(!fm.is_preview());
    }

    #[test]
    fn test_order_must_be_integer() {
        let (fm, _) = FrontMatter::parse("---\norder: 3\n---\n").unwrap();
        assert_eq!(fm.order, Some(3));

        let (fm, _) = FrontMatter::parse("---\norder: \"3\"\n---\n").unwrap();
        assert_eq!(fm.order, None);
    }

    #[test]
    fn test_single_string_tag() {
        let (fm, _) = FrontMatter::parse("---\ntags: sql\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["sql"]);
    }

    #[test]
    fn test_empty_title_is_unset() {
        let (fm, _) = FrontMatter::parse("---\ntitle: \"\"\n---\n").unwrap();
        assert_eq!(fm.title, None);
    }

    #[test]
    fn test_unknown_keys_kept_in_order() {
        let (fm, _) = FrontMatter::parse("---\nzeta: 1\nalpha: two\n---\n").unwrap();
        let keys: Vec<_> = fm.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_unterminated_block() {
        let err = FrontMatter::parse("---\ntitle: x\nno end").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_parse_lenient_keeps_whole_text() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        let (fm, body) = FrontMatter::parse_lenient(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_horizontal_rule_later_is_not_frontmatter() {
        let content = "intro\n---\nmore";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }
}
