//! Pipeline orchestration for topicgen.
//!
//! Ties the dataset reader, the generator, and the publisher together into a
//! single sequential run (`pipeline::run`).

pub mod pipeline;
