//! Core domain types for topic generation runs.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::TopicGenError;

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// Academic subject area, e.g. `Psychology`.
///
/// Keeps the caller's casing: it is printed as-is in prompts and issue text,
/// and only lower-cased when derived into a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    /// Build a domain from free text, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, TopicGenError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(TopicGenError::validation("domain name must not be empty"));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Issue label for this domain: `domain:<lowercase name>`.
    pub fn label(&self) -> String {
        format!("domain:{}", self.0.to_lowercase())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Domain {
    type Err = TopicGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// TopicCount
// ---------------------------------------------------------------------------

/// Number of topics requested from the model. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicCount(NonZeroU32);

impl TopicCount {
    pub fn new(count: NonZeroU32) -> Self {
        Self(count)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TopicCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TopicCount {
    type Err = TopicGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<NonZeroU32>()
            .map(Self)
            .map_err(|_| {
                TopicGenError::validation(format!(
                    "topic count must be a positive integer, got '{s}'"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// A single essay prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Topics already present in the dataset for one domain, in document order.
///
/// Duplicates are kept; the dataset is the source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingTopicSet(Vec<Topic>);

impl ExistingTopicSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.0.iter()
    }
}

impl From<Vec<Topic>> for ExistingTopicSet {
    fn from(topics: Vec<Topic>) -> Self {
        Self(topics)
    }
}

impl FromIterator<Topic> for ExistingTopicSet {
    fn from_iter<I: IntoIterator<Item = Topic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ExistingTopicSet {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Everything the generator needs for one call. Built and consumed in place.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub domain: &'a Domain,
    pub count: TopicCount,
    pub existing: &'a ExistingTopicSet,
}

/// Raw model output, expected to be a numbered list but never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText(String);

impl GeneratedText {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// RepoSlug
// ---------------------------------------------------------------------------

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = TopicGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            TopicGenError::validation(format!(
                "repository must be in 'owner/name' form, got '{s}'"
            ))
        };

        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_label_is_lowercased() {
        let domain = Domain::new("Psychology").unwrap();
        assert_eq!(domain.label(), "domain:psychology");
        assert_eq!(domain.to_string(), "Psychology");

        let domain = Domain::new("  Computer Science ").unwrap();
        assert_eq!(domain.label(), "domain:computer science");
    }

    #[test]
    fn domain_rejects_blank() {
        assert!(Domain::new("   ").is_err());
        assert!("".parse::<Domain>().is_err());
    }

    #[test]
    fn topic_count_parses_positive_text() {
        let count: TopicCount = "5".parse().unwrap();
        assert_eq!(count.get(), 5);
        assert_eq!(count.to_string(), "5");

        let count: TopicCount = " 12\n".parse().unwrap();
        assert_eq!(count.get(), 12);
    }

    #[test]
    fn topic_count_rejects_zero_and_garbage() {
        for bad in ["0", "-3", "five", "", "2.5"] {
            let err = bad.parse::<TopicCount>().unwrap_err();
            assert!(err.to_string().contains("positive integer"), "{bad}: {err}");
        }
    }

    #[test]
    fn repo_slug_parsing() {
        let slug: RepoSlug = "octo-org/essays".parse().unwrap();
        assert_eq!(slug.owner, "octo-org");
        assert_eq!(slug.name, "essays");
        assert_eq!(slug.to_string(), "octo-org/essays");

        for bad in ["essays", "/essays", "octo-org/", "a/b/c"] {
            assert!(bad.parse::<RepoSlug>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn existing_topics_keep_order_and_duplicates() {
        let set: ExistingTopicSet = ["B", "A", "B"].into_iter().map(Topic::new).collect();
        let texts: Vec<&str> = set.iter().map(Topic::as_str).collect();
        assert_eq!(texts, ["B", "A", "B"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn generated_text_is_trimmed() {
        let text = GeneratedText::new("\n\n1. One\n2. Two\n  ");
        assert_eq!(text.as_str(), "1. One\n2. Two");
    }
}
