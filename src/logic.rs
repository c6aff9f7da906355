//! Scoring and lookup behaviors shared by the console and any other driver.
//!
//! This includes:
//!   - Recording one item score (validated, no partial mutation)
//!   - Per-item score lookup (complete papers only)
//!   - Total score lookup
//!   - Listing a student's paper

use tracing::{debug, info, instrument, warn};

use crate::domain::{ExamPaper, TestItem};
use crate::error::{Result, RetestError};
use crate::state::AppState;
use crate::util::parse_score;

fn paper_of<'a>(state: &'a AppState, id: &str) -> Result<&'a ExamPaper> {
  state
    .catalog
    .require(id)?
    .paper()
    .ok_or_else(|| RetestError::NoPaper { id: id.to_string() })
}

/// Number of items on the student's paper.
pub fn paper_len(state: &AppState, id: &str) -> Result<usize> {
  Ok(paper_of(state, id)?.item_count())
}

/// Set item `index` from typed input. Returns the paper's new total.
#[instrument(level = "info", skip(state, raw), fields(%id, index = index))]
pub fn record_score(state: &mut AppState, id: &str, index: usize, raw: &str) -> Result<f64> {
  let paper = state
    .catalog
    .require_mut(id)?
    .paper_mut()
    .ok_or_else(|| RetestError::NoPaper { id: id.to_string() })?;
  let item = paper.get_item_mut(index)?;
  let score = parse_score(raw).inspect_err(|e| {
    warn!(target: "scoring", %id, index, error = %e, "Score rejected");
  })?;
  item.set_score(score)?;
  let total = paper.total_score();
  info!(target: "scoring", %id, index, score, total, "Score recorded");
  Ok(total)
}

/// Scores in paper order. Refused unless the paper has its full size.
#[instrument(level = "debug", skip(state), fields(%id))]
pub fn item_scores(state: &AppState, id: &str) -> Result<Vec<f64>> {
  let paper = paper_of(state, id)?;
  let required = state.quotas().total();
  if paper.item_count() != required {
    return Err(RetestError::PaperIncomplete { id: id.to_string(), items: paper.item_count(), required });
  }
  (0..required).map(|i| paper.get_item(i).map(TestItem::score)).collect()
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub fn total_score(state: &AppState, id: &str) -> Result<f64> {
  let total = paper_of(state, id)?.total_score();
  debug!(target: "scoring", %id, total, "Total score looked up");
  Ok(total)
}

/// "code | title | score" per item.
pub fn paper_listing(state: &AppState, id: &str) -> Result<Vec<String>> {
  Ok(
    paper_of(state, id)?
      .iter()
      .map(|i| format!("{} | {} | {}", i.test().code, i.test().title, i.score()))
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::TestItem;

  const ID: &str = "2019213001";

  fn state_with_papers() -> AppState {
    let mut state = AppState::from_config(None, Some(5));
    state.generate_all();
    state
  }

  #[test]
  fn recording_updates_one_item_and_the_total() {
    let mut state = state_with_papers();
    let total = record_score(&mut state, ID, 0, "7.5").unwrap();
    assert_eq!(total, 7.5);
    let scores = item_scores(&state, ID).unwrap();
    assert_eq!(scores[0], 7.5);
    assert!(scores[1..].iter().all(|s| *s == 0.0));
    assert_eq!(total_score(&state, ID).unwrap(), 7.5);
  }

  #[test]
  fn out_of_range_score_leaves_item_untouched() {
    let mut state = state_with_papers();
    record_score(&mut state, ID, 3, "4").unwrap();
    assert_eq!(
      record_score(&mut state, ID, 3, "11").unwrap_err(),
      RetestError::InvalidScore { input: "11".into() }
    );
    assert!(matches!(record_score(&mut state, ID, 3, "x"), Err(RetestError::InvalidScore { .. })));
    assert_eq!(item_scores(&state, ID).unwrap()[3], 4.0);
    assert_eq!(total_score(&state, ID).unwrap(), 4.0);
  }

  #[test]
  fn bad_index_and_unknown_student() {
    let mut state = state_with_papers();
    assert_eq!(
      record_score(&mut state, ID, 10, "1").unwrap_err(),
      RetestError::OutOfRange { index: 10, len: 10 }
    );
    assert!(matches!(record_score(&mut state, "x", 0, "1"), Err(RetestError::NotFound { .. })));
    assert!(matches!(total_score(&state, "x"), Err(RetestError::NotFound { .. })));
  }

  #[test]
  fn lookups_without_a_paper() {
    let state = AppState::from_config(None, Some(5));
    assert_eq!(total_score(&state, ID).unwrap_err(), RetestError::NoPaper { id: ID.into() });
    assert!(matches!(item_scores(&state, ID), Err(RetestError::NoPaper { .. })));
    assert!(matches!(paper_listing(&state, ID), Err(RetestError::NoPaper { .. })));
  }

  #[test]
  fn incomplete_paper_discloses_nothing() {
    let mut state = AppState::from_config(None, Some(5));
    let mut paper = ExamPaper::new();
    for i in 0..5 {
      paper.add_item(TestItem::new(state.database.get(i).unwrap().clone()));
    }
    state.catalog.require_mut(ID).unwrap().attach_paper(paper);

    assert_eq!(
      item_scores(&state, ID).unwrap_err(),
      RetestError::PaperIncomplete { id: ID.into(), items: 5, required: 10 }
    );
    assert_eq!(total_score(&state, ID).unwrap(), 0.0);
  }

  #[test]
  fn listing_shows_code_title_and_score() {
    let mut state = state_with_papers();
    record_score(&mut state, ID, 1, "9").unwrap();
    let lines = paper_listing(&state, ID).unwrap();
    assert_eq!(lines.len(), 10);
    assert!(lines[1].ends_with(" | 9"));
    assert_eq!(lines[1].split(" | ").count(), 3);
    assert_eq!(paper_len(&state, ID).unwrap(), 10);
  }
}
