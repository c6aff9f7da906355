//! Error taxonomy for the retest core.
//!
//! Every variant is recoverable at the operation boundary: the console reports
//! it and keeps running.

use thiserror::Error;

use crate::domain::Category;

pub type Result<T> = std::result::Result<T, RetestError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetestError {
  #[error("no student with id '{id}'")]
  NotFound { id: String },

  #[error("index {index} out of range (len {len})")]
  OutOfRange { index: usize, len: usize },

  #[error("the test database holds {available} tests but a paper needs {required}")]
  InsufficientPool { available: usize, required: usize },

  #[error("not enough {category} tests in the database: {available} available, {required} required")]
  InsufficientCategoryPool { category: Category, available: usize, required: usize },

  #[error("invalid score '{input}': expected a number between 0 and 10")]
  InvalidScore { input: String },

  #[error("id '{id}' is already used by {name}")]
  DuplicateId { id: String, name: String },

  #[error("a test with code '{code}' already exists")]
  DuplicateCode { code: String },

  #[error("invalid student {field}: '{value}'")]
  InvalidStudent { field: &'static str, value: String },

  #[error("student '{id}' has no exam paper yet")]
  NoPaper { id: String },

  #[error("exam paper of student '{id}' is incomplete ({items} of {required} items)")]
  PaperIncomplete { id: String, items: usize, required: usize },

  #[error("configuration error: {0}")]
  Config(String),
}
