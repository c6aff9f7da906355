//! The question bank: insertion-ordered tests, addressed by position.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{CategoryCounts, Test};
use crate::error::{Result, RetestError};

#[derive(Debug, Default)]
pub struct TestDatabase {
  tests: Vec<Arc<Test>>,
  codes: HashSet<String>,
}

impl TestDatabase {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a test. Codes are unique within the bank.
  pub fn add(&mut self, test: Test) -> Result<()> {
    if !self.codes.insert(test.code.clone()) {
      return Err(RetestError::DuplicateCode { code: test.code });
    }
    self.tests.push(Arc::new(test));
    Ok(())
  }

  pub fn get(&self, index: usize) -> Result<&Arc<Test>> {
    self.tests.get(index).ok_or(RetestError::OutOfRange { index, len: self.tests.len() })
  }

  pub fn count(&self) -> usize {
    self.tests.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Arc<Test>> {
    self.tests.iter()
  }

  pub fn category_counts(&self) -> CategoryCounts {
    CategoryCounts::from_tests(self.tests.iter().map(|t| t.as_ref()))
  }
}
