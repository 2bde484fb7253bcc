//! `@@@ <lang>` ... `@@@` code fences.

use regex::Regex;
use std::sync::OnceLock;

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn fence_regex() -> &'static Regex {
    FENCE_REGEX.get_or_init(|| Regex::new(r"(?ms)^@@@ (\w+)\r?\n(.*?)^@@@\r?$").unwrap())
}

/// Piece of an article body, either prose or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Code { language: &'a str, source: &'a str },
}

/// Split a body into prose and fenced code, in document order.
///
/// An opening `@@@ lang` without a matching closing line stays prose.
pub fn split_fences(body: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in fence_regex().captures_iter(body) {
        let (Some(whole), Some(language), Some(source)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&body[last..whole.start()]));
        }
        segments.push(Segment::Code {
            language: language.as_str(),
            source: source.as_str(),
        });
        last = whole.end();
    }

    if last < body.len() {
        segments.push(Segment::Text(&body[last..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fences() {
        assert_eq!(split_fences("just text"), vec![Segment::Text("just text")]);
        assert!(split_fences("").is_empty());
    }

    #[test]
    fn test_single_fence() {
        let segments = split_fences("intro\n@@@ ruby\nputs 1\n@@@\noutro");
        assert_eq!(
            segments,
            vec![
                Segment::Text("intro\n"),
                Segment::Code {
                    language: "ruby",
                    source: "puts 1\n"
                },
                Segment::Text("\noutro"),
            ]
        );
    }

    #[test]
    fn test_fences_are_non_greedy() {
        let body = "@@@ rust\nfn a() {}\n@@@\nmiddle\n@@@ js\nlet b;\n@@@";
        let segments = split_fences(body);
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[2],
            Segment::Code {
                language: "js",
                source: "let b;\n"
            }
        );
    }

    #[test]
    fn test_crlf_fence() {
        let segments = split_fences("@@@ ruby\r\nputs 1\r\n@@@\r\nafter");
        assert_eq!(
            segments,
            vec![
                Segment::Code {
                    language: "ruby",
                    source: "puts 1\r\n"
                },
                Segment::Text("\r\nafter"),
            ]
        );
    }

    #[test]
    fn test_markers_must_start_the_line() {
        let body = "text @@@ ruby\nputs 1\n@@@";
        assert_eq!(split_fences(body), vec![Segment::Text(body)]);
    }

    #[test]
    fn test_unclosed_fence_stays_text() {
        let body = "@@@ ruby\nputs 1\n";
        assert_eq!(split_fences(body), vec![Segment::Text(body)]);
    }
}
