//! Golden dataset markdown parser.
//!
//! The dataset groups topics by domain:
//! - Domains are level-3 headings: `### Psychology`
//! - A domain section runs until the next level-3 heading; `##` and `####`
//!   headings inside it do not end it
//! - Topics live in table rows: `| rub_psy_01 | Topic text | ... |`

use std::sync::LazyLock;

use regex::Regex;
use topicgen_shared::{Domain, ExistingTopicSet, Topic};

/// Heading level that introduces a domain section.
const DOMAIN_HEADING_LEVEL: usize = 3;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches an ATX heading, capturing the hashes and the heading text.
///
/// A closing `#` run only counts when whitespace precedes it, so `### C#`
/// keeps its text.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").expect("heading regex")
});

/// Matches the first two cells of a table row.
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\|([^|]*)\|([^|]*)\|").expect("table row regex")
});

/// Identifier body after the configured prefix: `psy_01`, `x_1`.
static ID_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+_\d+$").expect("identifier regex")
});

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Extract the topics listed under `domain`, in document order.
///
/// Only the first section headed by `domain` is read. A document without
/// that section yields an empty set.
pub fn extract_topics(content: &str, domain: &Domain, id_prefix: &str) -> ExistingTopicSet {
    section_topics(content, domain, id_prefix).unwrap_or_default()
}

/// Like [`extract_topics`], but `None` when the document has no section for
/// `domain`.
pub fn section_topics(
    content: &str,
    domain: &Domain,
    id_prefix: &str,
) -> Option<ExistingTopicSet> {
    let section = domain_section(content, domain)?;
    Some(
        section
            .lines()
            .filter_map(|line| topic_from_row(line, id_prefix))
            .collect(),
    )
}

/// Locate the body of the first `### <domain>` section (case-insensitive).
///
/// The returned slice starts right after the heading line and ends before the
/// next level-3 heading, or at end of document.
fn domain_section<'a>(content: &'a str, domain: &Domain) -> Option<&'a str> {
    let wanted = domain.as_str().to_lowercase();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let Some((level, text)) = heading(line) else {
            continue;
        };

        match start {
            None if level == DOMAIN_HEADING_LEVEL && text.to_lowercase() == wanted => {
                start = Some(offset);
            }
            Some(body_start) if level == DOMAIN_HEADING_LEVEL => {
                return Some(&content[body_start..line_start]);
            }
            _ => {}
        }
    }

    start.map(|body_start| &content[body_start..])
}

/// Parse a heading line into `(level, text)`, dropping any closing sequence.
fn heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    Some((level, caps.get(2)?.as_str()))
}

/// Read the topic from a table row whose first cell is a dataset identifier.
fn topic_from_row(line: &str, id_prefix: &str) -> Option<Topic> {
    let caps = ROW_RE.captures(line)?;
    let id = caps.get(1)?.as_str().trim();
    let suffix = id.strip_prefix(id_prefix)?;
    if !ID_SUFFIX_RE.is_match(suffix) {
        return None;
    }
    Some(Topic::new(caps.get(2)?.as_str().trim()))
}
