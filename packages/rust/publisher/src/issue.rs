//! Issue content for a batch of generated topics.

use serde::{Deserialize, Serialize};
use topicgen_shared::{Domain, GeneratedText, TopicCount};

/// Label attached to every generated-topics issue.
pub const NEW_TOPICS_LABEL: &str = "new-topics";

/// Title, body, and labels of the issue to file. Serialized as the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl IssueDraft {
    /// Build the issue announcing `topics` for `domain`.
    ///
    /// The generated text is embedded verbatim after a separator line.
    pub fn for_topics(domain: &Domain, count: TopicCount, topics: &GeneratedText) -> Self {
        Self {
            title: format!("New Topics Generated for: {domain}"),
            body: format!(
                "Hi team,\n\n\
                 The topic generation workflow has created **{count}** new topic(s) \
                 for the **{domain}** domain.\n\n\
                 ---\n\n\
                 {topics}"
            ),
            labels: vec![NEW_TOPICS_LABEL.to_string(), domain.label()],
        }
    }
}

/// The part of the created issue we read back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
}
