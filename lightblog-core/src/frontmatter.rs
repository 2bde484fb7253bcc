//! Metadata block parsing from article files.
//!
//! An article file is a YAML metadata block, a blank line, then the body:
//!
//! ```text
//! title: My Article Title
//! created_at: 2022-10-10 10:00
//! tags: [sample, awesome]
//!
//! # Body starts here
//! ```

use crate::models::ArticleHeader;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

static VALID_TAG: OnceLock<Regex> = OnceLock::new();

fn valid_tag_regex() -> &'static Regex {
    VALID_TAG.get_or_init(|| Regex::new(r"^[0-9A-Za-z_-]+$").unwrap())
}

/// Split file content into `(metadata, body)` at the first blank line.
///
/// Without a blank line the whole file is treated as metadata and the body
/// is empty.
pub fn split_article(content: &str) -> (&str, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lf = content.find("\n\n").map(|idx| (idx, 2));
    let crlf = content.find("\r\n\r\n").map(|idx| (idx, 4));

    let split = match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match split {
        Some((idx, len)) => (&content[..idx], &content[idx + len..]),
        None => (content, ""),
    }
}

/// Parse and validate a metadata block.
///
/// Unknown keys are ignored; `title` and `created_at` must be present and
/// non-blank. Date syntax is checked later against the configured format.
///
/// # Example
///
/// ```
/// use lightblog_core::frontmatter::parse_header;
///
/// let header = parse_header("title: My Post\ncreated_at: 2025-01-01 10:00").unwrap();
/// assert_eq!(header.title.as_deref(), Some("My Post"));
/// ```
pub fn parse_header(yaml: &str) -> Result<ArticleHeader, FrontmatterError> {
    let header: ArticleHeader = if yaml.trim().is_empty() {
        ArticleHeader::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    if header.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(FrontmatterError::MissingField("title"));
    }
    if header
        .created_at
        .as_deref()
        .map_or(true, |d| d.trim().is_empty())
    {
        return Err(FrontmatterError::MissingField("created_at"));
    }

    Ok(header)
}

/// Keep only tags made of `[A-Za-z0-9_-]`, dropping duplicates.
pub fn filter_valid_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let re = valid_tag_regex();
    let mut valid: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref();
        if re.is_match(tag) && !valid.iter().any(|t| t == tag) {
            valid.push(tag.to_string());
        }
    }
    valid
}

/// Parse a date with a strftime-style format; `None` when it does not match.
///
/// Formats without time fields yield midnight.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, format).ok().or_else(|| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_first_blank_line() {
        let (meta, body) = split_article("title: A\n\n# Body\n\nMore");
        assert_eq!(meta, "title: A");
        assert_eq!(body, "# Body\n\nMore");
    }

    #[test]
    fn test_split_crlf() {
        let (meta, body) = split_article("title: A\r\n\r\nBody");
        assert_eq!(meta, "title: A");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_without_blank_line() {
        let (meta, body) = split_article("title: A\ncreated_at: x");
        assert_eq!(meta, "title: A\ncreated_at: x");
        assert_eq!(body, "");
    }

    #[test]
    fn test_parse_valid_header() {
        let yaml = r#"title: Test Post
created_at: 2022-10-10 10:00
updated_at: 2022-10-11 09:00
summary: A test post
process_erb: true
tags:
  - rust
  - inv@lid
  - programming"#;

        let header = parse_header(yaml).unwrap();
        assert_eq!(header.title.as_deref(), Some("Test Post"));
        assert_eq!(header.created_at.as_deref(), Some("2022-10-10 10:00"));
        assert_eq!(header.updated_at.as_deref(), Some("2022-10-11 09:00"));
        assert_eq!(header.summary.as_deref(), Some("A test post"));
        assert!(header.process_template);
        assert_eq!(header.tags, vec!["rust", "inv@lid", "programming"]);
    }

    #[test]
    fn test_templating_flag_aliases() {
        let header =
            parse_header("title: T\ncreated_at: 2022-01-01 00:00\nprocess_template: true").unwrap();
        assert!(header.process_template);

        let header = parse_header("title: T\ncreated_at: 2022-01-01 00:00").unwrap();
        assert!(!header.process_template);
    }

    #[test]
    fn test_scalars_are_read_as_strings() {
        let header = parse_header("title: 1984\ncreated_at: 2022\ntags: [2022, ok]").unwrap();
        assert_eq!(header.title.as_deref(), Some("1984"));
        assert_eq!(header.created_at.as_deref(), Some("2022"));
        assert_eq!(header.tags, vec!["2022", "ok"]);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let yaml = "title: T\ncreated_at: 2022-01-01 00:00\nlayout: post\nviews: 12";
        let header = parse_header(yaml).unwrap();
        assert_eq!(header.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_missing_title() {
        match parse_header("created_at: 2022-01-01 00:00") {
            Err(FrontmatterError::MissingField(field)) => assert_eq!(field, "title"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
        assert!(matches!(
            parse_header("title: '  '\ncreated_at: 2022-01-01 00:00"),
            Err(FrontmatterError::MissingField("title"))
        ));
    }

    #[test]
    fn test_missing_created_at() {
        assert!(matches!(
            parse_header("title: T"),
            Err(FrontmatterError::MissingField("created_at"))
        ));
        assert!(matches!(
            parse_header(""),
            Err(FrontmatterError::MissingField("title"))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            parse_header("title: [unclosed"),
            Err(FrontmatterError::YamlError(_))
        ));
        // a body with no metadata block in front of it
        assert!(parse_header("Just some prose without a header").is_err());
    }

    #[test]
    fn test_filter_valid_tags() {
        let tags = filter_valid_tags(["sample", "inv@lid", "awesome", "with space", "a_b-c"]);
        assert_eq!(tags, vec!["sample", "awesome", "a_b-c"]);
    }

    #[test]
    fn test_filter_valid_tags_is_idempotent() {
        let once = filter_valid_tags(["x", "x", "y!", "", "z"]);
        let twice = filter_valid_tags(&once);
        assert_eq!(once, vec!["x", "z"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_date_with_format() {
        let dt = parse_date("2022-10-10 10:30", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2022, 10, 10)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );

        let date_only = parse_date("20/05/2022", "%d/%m/%Y").unwrap();
        assert_eq!(date_only.date(), NaiveDate::from_ymd_opt(2022, 5, 20).unwrap());
    }

    #[test]
    fn test_parse_date_failure_is_none() {
        assert_eq!(parse_date("20/05/2022", "%Y-%m-%d %H:%M"), None);
        assert_eq!(parse_date("not a date", "%Y-%m-%d"), None);
    }
}
