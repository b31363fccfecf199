//! Golden dataset reader.
//!
//! Reads the markdown dataset and returns the topics already recorded for a
//! domain, so the generator can be told what to avoid. A missing file or a
//! missing domain section is not an error: it simply means there is nothing
//! to avoid yet.

mod parser;

use std::io::ErrorKind;
use std::path::Path;

use topicgen_shared::{Domain, ExistingTopicSet, Result, TopicGenError};
use tracing::{info, instrument, warn};

pub use parser::{extract_topics, section_topics};

/// Load the existing topics for `domain` from the dataset at `path`.
///
/// Returns an empty set when the file does not exist or has no section for
/// the domain. Other I/O failures (permissions, invalid UTF-8) are errors.
#[instrument(skip_all, fields(path = %path.display(), domain = %domain))]
pub fn load_existing_topics(
    path: &Path,
    domain: &Domain,
    id_prefix: &str,
) -> Result<ExistingTopicSet> {
    info!("reading existing topics from dataset");

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("dataset file not found, continuing with no existing topics");
            return Ok(ExistingTopicSet::default());
        }
        Err(e) => return Err(TopicGenError::io(path, e)),
    };

    let Some(topics) = section_topics(&content, domain, id_prefix) else {
        warn!("no section found for domain");
        return Ok(ExistingTopicSet::default());
    };

    info!(count = topics.len(), "found existing topics");
    Ok(topics)
}
