//! Front matter extraction and parsing.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

const DELIMITER: &str = "---";

/// Parsed front matter from a Markdown post.
///
/// Every field is optional; the loader applies defaults for missing values.
/// Scalar YAML values of any kind are accepted and kept as strings, so
/// `id: 42` and `date: 2024-01-02` both deserialize.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FrontMatter {
    /// Stable post identifier
    #[serde(default, deserialize_with = "scalar")]
    pub id: Option<String>,

    /// Display title
    #[serde(default, deserialize_with = "scalar")]
    pub title: Option<String>,

    /// Publication date, validated later by the loader
    #[serde(default, deserialize_with = "scalar")]
    pub date: Option<String>,

    /// Top-level navigation group
    #[serde(default, deserialize_with = "scalar")]
    pub category: Option<String>,

    /// Optional group beneath the category
    #[serde(default, deserialize_with = "scalar")]
    pub subcategory: Option<String>,
}

impl FrontMatter {
    /// Returns true when no field was declared.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Accept any YAML scalar and stringify it. Sequences, mappings and nulls
/// are treated as absent.
fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Extract front matter from Markdown content.
///
/// Returns the parsed front matter and the body after the closing delimiter.
/// When the text does not open with a `---` line, the whole text is the body.
pub fn extract_front_matter(source: &str) -> Result<(Option<FrontMatter>, &str), FrontMatterError> {
    let Some((yaml, body)) = locate_block(source)? else {
        return Ok((None, source));
    };

    Ok((Some(parse_yaml(yaml)?), body))
}

/// Split front matter from the body without ever failing.
///
/// An unclosed block is not treated as front matter: the metadata is empty
/// and the whole text is the body. A closed block with invalid YAML yields
/// empty metadata and the text after the block, so delimiters never reach
/// the body.
pub fn split_front_matter(source: &str) -> (FrontMatter, &str) {
    match locate_block(source) {
        Ok(None) => (FrontMatter::default(), source),
        Ok(Some((yaml, body))) => match parse_yaml(yaml) {
            Ok(front_matter) => (front_matter, body),
            Err(e) => {
                tracing::warn!("Ignoring front matter: {}", e);
                (FrontMatter::default(), body)
            }
        },
        Err(e) => {
            tracing::warn!("Ignoring front matter: {}", e);
            (FrontMatter::default(), source)
        }
    }
}

/// Find the YAML block and the body that follows it.
fn locate_block(source: &str) -> Result<Option<(&str, &str)>, FrontMatterError> {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (first, rest) = match text.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (text, ""),
    };

    if !is_delimiter(first) {
        return Ok(None);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Some((yaml, body)));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unclosed)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn parse_yaml(yaml: &str) -> Result<FrontMatter, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    serde_yaml::from_str(yaml).map_err(|e| FrontMatterError::InvalidYaml(e.to_string()))
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("Unclosed front matter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in front matter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_front_matter() {
        let source = r#"---
title: "Alpha"
date: 2024-01-02
category: Tech
---

# Alpha

Hello
"#;

        let (fm, body) = extract_front_matter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Alpha"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-02"));
        assert_eq!(fm.category.as_deref(), Some("Tech"));
        assert_eq!(fm.subcategory, None);
        assert_eq!(body, "\n# Alpha\n\nHello\n");
    }

    #[test]
    fn handles_no_front_matter() {
        let source = "# Just Markdown\n\nNo front matter here.";

        let (fm, body) = extract_front_matter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(body, source);
    }

    #[test]
    fn stringifies_scalar_values() {
        let source = "---\nid: 42\ntitle: true\n---\nBody";

        let (fm, body) = split_front_matter(source);

        assert_eq!(fm.id.as_deref(), Some("42"));
        assert_eq!(fm.title.as_deref(), Some("true"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn ignores_unknown_and_non_scalar_keys() {
        let source = "---\ntitle: Tags\ntags: [a, b]\ncategory: [x]\n---\nBody";

        let (fm, _) = split_front_matter(source);

        assert_eq!(fm.title.as_deref(), Some("Tags"));
        assert_eq!(fm.category, None);
    }

    #[test]
    fn errors_on_unclosed_front_matter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_front_matter(source);

        assert!(matches!(result, Err(FrontMatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_front_matter(source);

        assert!(matches!(result, Err(FrontMatterError::InvalidYaml(_))));
    }

    #[test]
    fn lenient_split_keeps_whole_text_when_unclosed() {
        let source = "---\ntitle: Test\n# No closing";

        let (fm, body) = split_front_matter(source);

        assert!(fm.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn lenient_split_drops_invalid_block() {
        let source = "---\ntitle: [invalid yaml\n---\nStill here";

        let (fm, body) = split_front_matter(source);

        assert!(fm.is_empty());
        assert_eq!(body, "Still here");
    }

    #[test]
    fn empty_block_yields_empty_metadata() {
        let (fm, body) = split_front_matter("---\n---\nText");

        assert!(fm.is_empty());
        assert_eq!(body, "Text");
    }

    #[test]
    fn accepts_crlf_and_bom() {
        let source = "\u{feff}---\r\ntitle: Windows\r\n---\r\nBody\r\n";

        let (fm, body) = split_front_matter(source);

        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn thematic_break_later_in_text_is_not_front_matter() {
        let source = "Intro\n---\ntitle: nope\n---\n";

        let (fm, body) = split_front_matter(source);

        assert!(fm.is_empty());
        assert_eq!(body, source);
    }
}
