//! Core domain models for topic-cards.
//!
//! Pure data types with no I/O dependencies.

pub mod topic;

pub use topic::TopicRecord;
