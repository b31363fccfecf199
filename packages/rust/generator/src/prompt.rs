//! Prompt construction for topic generation.

use std::fmt::Write as _;

use topicgen_shared::GenerationRequest;

/// Render the generation prompt for a request.
///
/// Existing topics are listed one `- ` bullet per line, in dataset order.
pub fn build_prompt(request: &GenerationRequest<'_>) -> String {
    let domain = request.domain;
    let count = request.count;

    let mut existing = String::new();
    for topic in request.existing {
        let _ = writeln!(existing, "- {topic}");
    }

    format!(
        "You are an expert curriculum designer for university-level courses in the {domain} domain.\n\
         \n\
         Generate exactly {count} new and unique essay topics suitable for undergraduate students.\n\
         The topics must be different from the following existing topics:\n\
         \n\
         --- EXISTING TOPICS ---\n\
         {existing}\
         ---------------------\n\
         \n\
         Provide the output ONLY as a numbered list with each topic on a new line.\n\
         Do not include any other text, title, or preamble.\n"
    )
}
