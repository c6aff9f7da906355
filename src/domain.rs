//! Domain models: test categories, tests, paper items, exam papers and students.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetestError};

/// Highest score a single item can be awarded.
pub const MAX_ITEM_SCORE: f64 = 10.0;

/// Which part of the retest a question belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  English,
  Math,
  Professional,
}

impl Category {
  pub const ALL: [Category; 3] = [Category::English, Category::Math, Category::Professional];

  pub fn as_str(self) -> &'static str {
    match self {
      Category::English => "english",
      Category::Math => "math",
      Category::Professional => "professional",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Category-specific payload. Only used for display; generation looks at the tag.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum TestKind {
  /// `direction` is the translation/listening mode, e.g. "C-E", "E-C", "Hearing".
  English { direction: String },
  Math { image: String, steps: String },
  Professional { requirements: String, reference_code: String, image: String },
}

/// One question of the bank. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Test {
  pub code: String,
  pub title: String,
  pub difficulty: u32,
  pub criteria: String,
  #[serde(flatten)]
  pub kind: TestKind,
}

impl Test {
  pub fn english(code: &str, title: &str, difficulty: u32, criteria: &str, direction: &str) -> Self {
    Self::new(code, title, difficulty, criteria, TestKind::English { direction: direction.into() })
  }

  pub fn math(code: &str, title: &str, difficulty: u32, criteria: &str, image: &str, steps: &str) -> Self {
    Self::new(
      code,
      title,
      difficulty,
      criteria,
      TestKind::Math { image: image.into(), steps: steps.into() },
    )
  }

  pub fn professional(
    code: &str,
    title: &str,
    difficulty: u32,
    criteria: &str,
    requirements: &str,
    reference_code: &str,
    image: &str,
  ) -> Self {
    Self::new(
      code,
      title,
      difficulty,
      criteria,
      TestKind::Professional {
        requirements: requirements.into(),
        reference_code: reference_code.into(),
        image: image.into(),
      },
    )
  }

  pub fn new(code: &str, title: &str, difficulty: u32, criteria: &str, kind: TestKind) -> Self {
    Self {
      code: code.into(),
      title: title.into(),
      difficulty,
      criteria: criteria.into(),
      kind,
    }
  }

  pub fn category(&self) -> Category {
    match self.kind {
      TestKind::English { .. } => Category::English,
      TestKind::Math { .. } => Category::Math,
      TestKind::Professional { .. } => Category::Professional,
    }
  }
}

/// Required number of items per category in a complete paper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Quotas {
  pub english: usize,
  pub math: usize,
  pub professional: usize,
}

impl Default for Quotas {
  fn default() -> Self {
    Self { english: 3, math: 3, professional: 4 }
  }
}

impl Quotas {
  pub fn get(&self, category: Category) -> usize {
    match category {
      Category::English => self.english,
      Category::Math => self.math,
      Category::Professional => self.professional,
    }
  }

  /// Size of a complete paper. Saturates, so absurd config values read as "unsatisfiable".
  pub fn total(&self) -> usize {
    self.english.saturating_add(self.math).saturating_add(self.professional)
  }
}

/// Running tally of items per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts([usize; 3]);

impl CategoryCounts {
  fn slot(category: Category) -> usize {
    match category {
      Category::English => 0,
      Category::Math => 1,
      Category::Professional => 2,
    }
  }

  pub fn get(&self, category: Category) -> usize {
    self.0[Self::slot(category)]
  }

  pub fn bump(&mut self, category: Category) {
    self.0[Self::slot(category)] += 1;
  }

  pub fn from_tests<'a>(tests: impl IntoIterator<Item = &'a Test>) -> Self {
    let mut counts = Self::default();
    for t in tests {
      counts.bump(t.category());
    }
    counts
  }
}

/// A test placed on a paper together with the score awarded for it.
#[derive(Clone, Debug)]
pub struct TestItem {
  test: Arc<Test>,
  score: f64,
}

impl TestItem {
  pub fn new(test: Arc<Test>) -> Self {
    Self { test, score: 0.0 }
  }

  pub fn test(&self) -> &Test {
    &self.test
  }

  pub fn score(&self) -> f64 {
    self.score
  }

  /// Rejects anything outside `[0, 10]` and leaves the current score untouched.
  pub fn set_score(&mut self, score: f64) -> Result<()> {
    if !score.is_finite() || !(0.0..=MAX_ITEM_SCORE).contains(&score) {
      return Err(RetestError::InvalidScore { input: score.to_string() });
    }
    self.score = score;
    Ok(())
  }

  fn same_test(&self, other: &TestItem) -> bool {
    Arc::ptr_eq(&self.test, &other.test)
  }
}

/// Ordered items of one student's retest.
#[derive(Clone, Debug, Default)]
pub struct ExamPaper {
  items: Vec<TestItem>,
}

impl ExamPaper {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_item(&mut self, item: TestItem) {
    self.items.push(item);
  }

  /// Removes the first item wrapping the same test instance as `item`.
  #[allow(dead_code)]
  pub fn remove_item(&mut self, item: &TestItem) -> Option<TestItem> {
    let pos = self.items.iter().position(|i| i.same_test(item))?;
    Some(self.items.remove(pos))
  }

  pub fn get_item(&self, index: usize) -> Result<&TestItem> {
    let len = self.items.len();
    self.items.get(index).ok_or(RetestError::OutOfRange { index, len })
  }

  pub fn get_item_mut(&mut self, index: usize) -> Result<&mut TestItem> {
    let len = self.items.len();
    self.items.get_mut(index).ok_or(RetestError::OutOfRange { index, len })
  }

  pub fn item_count(&self) -> usize {
    self.items.len()
  }

  pub fn total_score(&self) -> f64 {
    self.items.iter().map(TestItem::score).sum()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, TestItem> {
    self.items.iter()
  }

  pub fn category_counts(&self) -> CategoryCounts {
    CategoryCounts::from_tests(self.items.iter().map(TestItem::test))
  }

  pub fn is_complete(&self, quotas: &Quotas) -> bool {
    let counts = self.category_counts();
    self.item_count() == quotas.total() && Category::ALL.iter().all(|c| counts.get(*c) == quotas.get(*c))
  }
}

impl<'a> IntoIterator for &'a ExamPaper {
  type Item = &'a TestItem;
  type IntoIter = std::slice::Iter<'a, TestItem>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.iter()
  }
}

#[derive(Clone, Debug)]
pub struct Student {
  id: String,
  name: String,
  paper: Option<ExamPaper>,
}

impl Student {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self { id: id.into(), name: name.into(), paper: None }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn paper(&self) -> Option<&ExamPaper> {
    self.paper.as_ref()
  }

  pub fn paper_mut(&mut self) -> Option<&mut ExamPaper> {
    self.paper.as_mut()
  }

  /// Replaces any previous paper; returns it.
  pub fn attach_paper(&mut self, paper: ExamPaper) -> Option<ExamPaper> {
    self.paper.replace(paper)
  }
}
