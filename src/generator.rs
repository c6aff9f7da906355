//! Exam paper generation: quota-constrained sampling without replacement.
//!
//! Flow:
//! 1) Count tests per category over the whole bank and check the quotas can be met.
//! 2) Draw positions from the bank until every category quota is saturated.
//! 3) Hand back a fresh paper (every item scored 0). The caller attaches it.
//!
//! Two policies produce the same kind of paper:
//!   - `Rejection`: draw any position, keep it if unchosen and its category still has room.
//!   - `Stratified`: draw exactly `quota` distinct positions inside each category.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::database::TestDatabase;
use crate::domain::{Category, CategoryCounts, ExamPaper, Quotas, TestItem};
use crate::error::{Result, RetestError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
  #[default]
  Rejection,
  Stratified,
}

pub struct ExamPaperGenerator {
  quotas: Quotas,
  policy: SamplingPolicy,
  rng: StdRng,
}

impl ExamPaperGenerator {
  /// `seed = None` draws from OS entropy; a fixed seed makes every run repeatable.
  pub fn new(quotas: Quotas, policy: SamplingPolicy, seed: Option<u64>) -> Self {
    let rng = match seed {
      Some(s) => StdRng::seed_from_u64(s),
      None => StdRng::from_entropy(),
    };
    Self { quotas, policy, rng }
  }

  pub fn quotas(&self) -> &Quotas {
    &self.quotas
  }

  pub fn policy(&self) -> SamplingPolicy {
    self.policy
  }

  pub fn generate(&mut self, db: &TestDatabase) -> Result<ExamPaper> {
    check_pool(db, &self.quotas)?;
    let paper = match self.policy {
      SamplingPolicy::Rejection => rejection_sample(db, &self.quotas, &mut self.rng)?,
      SamplingPolicy::Stratified => stratified_sample(db, &self.quotas, &mut self.rng)?,
    };
    debug_assert!(paper.is_complete(&self.quotas));
    debug!(target: "generator", policy = ?self.policy, items = paper.item_count(), "Exam paper drawn");
    Ok(paper)
  }
}

/// Fails when the bank is smaller than a paper or any category is below its quota.
pub fn check_pool(db: &TestDatabase, quotas: &Quotas) -> Result<CategoryCounts> {
  let required = quotas.total();
  if db.count() < required {
    return Err(RetestError::InsufficientPool { available: db.count(), required });
  }
  let counts = db.category_counts();
  for category in Category::ALL {
    if counts.get(category) < quotas.get(category) {
      return Err(RetestError::InsufficientCategoryPool {
        category,
        available: counts.get(category),
        required: quotas.get(category),
      });
    }
  }
  Ok(counts)
}

fn rejection_sample<R: Rng + ?Sized>(db: &TestDatabase, quotas: &Quotas, rng: &mut R) -> Result<ExamPaper> {
  let count = db.count();
  let mut chosen = vec![false; count];
  let mut taken = CategoryCounts::default();
  let mut paper = ExamPaper::new();
  let mut draws: u64 = 0;

  while paper.item_count() < quotas.total() {
    let target = rng.gen_range(0..count);
    draws += 1;
    let test = db.get(target)?;
    let category = test.category();
    if chosen[target] || taken.get(category) >= quotas.get(category) {
      continue;
    }
    chosen[target] = true;
    taken.bump(category);
    paper.add_item(TestItem::new(Arc::clone(test)));
  }

  trace!(target: "generator", draws, pool = count, "Rejection sampling finished");
  Ok(paper)
}

fn stratified_sample<R: Rng + ?Sized>(db: &TestDatabase, quotas: &Quotas, rng: &mut R) -> Result<ExamPaper> {
  let mut paper = ExamPaper::new();
  for category in Category::ALL {
    let positions: Vec<usize> = db
      .iter()
      .enumerate()
      .filter(|(_, t)| t.category() == category)
      .map(|(i, _)| i)
      .collect();
    for pick in index::sample(rng, positions.len(), quotas.get(category)).into_iter() {
      paper.add_item(TestItem::new(Arc::clone(db.get(positions[pick])?)));
    }
  }
  Ok(paper)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  use proptest::prelude::*;

  use crate::domain::Test;
  use crate::seeds::seed_tests;

  fn pool(english: usize, math: usize, professional: usize) -> TestDatabase {
    let mut db = TestDatabase::new();
    for i in 0..english {
      db.add(Test::english(&format!("E{i:03}"), "t", 1, "c", "C-E")).unwrap();
    }
    for i in 0..math {
      db.add(Test::math(&format!("M{i:03}"), "t", 1, "c", "no image", "no")).unwrap();
    }
    for i in 0..professional {
      db.add(Test::professional(&format!("P{i:03}"), "t", 1, "c", "r", "no", "no image")).unwrap();
    }
    db
  }

  fn seeded_bank() -> TestDatabase {
    let mut db = TestDatabase::new();
    for t in seed_tests() {
      db.add(t).unwrap();
    }
    db
  }

  fn codes(paper: &ExamPaper) -> Vec<String> {
    paper.iter().map(|i| i.test().code.clone()).collect()
  }

  fn assert_valid(paper: &ExamPaper) {
    let quotas = Quotas::default();
    assert!(paper.is_complete(&quotas), "quota mismatch: {:?}", paper.category_counts());
    let distinct: HashSet<_> = codes(paper).into_iter().collect();
    assert_eq!(distinct.len(), paper.item_count());
    assert!(paper.iter().all(|i| i.score() == 0.0));
  }

  #[test]
  fn seeded_bank_produces_valid_papers_for_both_policies() {
    let db = seeded_bank();
    for policy in [SamplingPolicy::Rejection, SamplingPolicy::Stratified] {
      let mut generator = ExamPaperGenerator::new(Quotas::default(), policy, Some(7));
      for _ in 0..20 {
        assert_valid(&generator.generate(&db).unwrap());
      }
    }
  }

  #[test]
  fn same_seed_same_paper() {
    let db = seeded_bank();
    for policy in [SamplingPolicy::Rejection, SamplingPolicy::Stratified] {
      let a = ExamPaperGenerator::new(Quotas::default(), policy, Some(2024)).generate(&db).unwrap();
      let b = ExamPaperGenerator::new(Quotas::default(), policy, Some(2024)).generate(&db).unwrap();
      assert_eq!(codes(&a), codes(&b));
    }
  }

  #[test]
  fn unseeded_generation_still_meets_quotas() {
    let db = seeded_bank();
    let mut generator = ExamPaperGenerator::new(Quotas::default(), SamplingPolicy::Rejection, None);
    assert_valid(&generator.generate(&db).unwrap());
    assert_valid(&generator.generate(&db).unwrap());
  }

  #[test]
  fn exact_boundary_pool_selects_everything() {
    let db = pool(3, 3, 4);
    let mut generator = ExamPaperGenerator::new(Quotas::default(), SamplingPolicy::Rejection, Some(1));
    let paper = generator.generate(&db).unwrap();
    assert_valid(&paper);
    let all: HashSet<_> = db.iter().map(|t| t.code.clone()).collect();
    let picked: HashSet<_> = codes(&paper).into_iter().collect();
    assert_eq!(all, picked);
  }

  #[test]
  fn category_shortfall_is_reported() {
    let db = pool(2, 5, 5);
    let mut generator = ExamPaperGenerator::new(Quotas::default(), SamplingPolicy::Rejection, Some(1));
    let err = generator.generate(&db).unwrap_err();
    assert_eq!(
      err,
      RetestError::InsufficientCategoryPool { category: Category::English, available: 2, required: 3 }
    );
  }

  #[test]
  fn small_pool_is_reported() {
    let db = pool(3, 3, 3);
    let err = check_pool(&db, &Quotas::default()).unwrap_err();
    assert_eq!(err, RetestError::InsufficientPool { available: 9, required: 10 });
  }

  #[test]
  fn custom_quotas_are_honoured() {
    let db = seeded_bank();
    let quotas = Quotas { english: 1, math: 2, professional: 0 };
    let mut generator = ExamPaperGenerator::new(quotas, SamplingPolicy::Stratified, Some(3));
    let paper = generator.generate(&db).unwrap();
    assert!(paper.is_complete(&quotas));
    assert_eq!(paper.item_count(), 3);
  }

  proptest! {
    #[test]
    fn any_seed_any_pool_meets_quotas(
      english in 3usize..9,
      math in 3usize..9,
      professional in 4usize..9,
      seed in any::<u64>(),
      stratified in any::<bool>(),
    ) {
      let db = pool(english, math, professional);
      let policy = if stratified { SamplingPolicy::Stratified } else { SamplingPolicy::Rejection };
      let paper = ExamPaperGenerator::new(Quotas::default(), policy, Some(seed)).generate(&db).unwrap();
      prop_assert!(paper.is_complete(&Quotas::default()));
      let distinct: HashSet<_> = codes(&paper).into_iter().collect();
      prop_assert_eq!(distinct.len(), 10);
    }
  }
}
