//! Application state: question bank, student roster, paper generator and roster format.
//!
//! This module owns:
//!   - bootstrap (TOML config when present, built-in seeds otherwise)
//!   - paper generation for one student or the whole roster
//!   - explicit student addition

use tracing::{error, info, instrument, warn};

use crate::catalog::StudentCatalog;
use crate::config::{load_config_from_env, seed_from_env, RetestConfig, TestCfg};
use crate::database::TestDatabase;
use crate::domain::{Category, Quotas, Student};
use crate::error::{Result, RetestError};
use crate::format::Format;
use crate::generator::ExamPaperGenerator;
use crate::seeds::{seed_students, seed_tests};
use crate::util::{is_valid_student_id, is_valid_student_name, strip_spaces};

pub struct AppState {
    pub catalog: StudentCatalog,
    pub database: TestDatabase,
    pub generator: ExamPaperGenerator,
    pub format: Format,
}

impl AppState {
    pub fn new(catalog: StudentCatalog, database: TestDatabase, generator: ExamPaperGenerator, format: Format) -> Self {
        Self { catalog, database, generator, format }
    }

    /// Build state from env: RETEST_CONFIG_PATH and RETEST_SEED.
    pub fn from_env() -> Self {
        Self::from_config(load_config_from_env(), seed_from_env())
    }

    /// Bank and roster come from the config when it lists any, otherwise from the seeds.
    /// Bad entries are logged and skipped.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: Option<RetestConfig>, seed_override: Option<u64>) -> Self {
        let cfg = cfg.unwrap_or_default();

        let tests = if cfg.tests.is_empty() {
            seed_tests()
        } else {
            cfg.tests.into_iter().map(TestCfg::into_test).collect()
        };
        let mut database = TestDatabase::new();
        for test in tests {
            let code = test.code.clone();
            if let Err(e) = database.add(test) {
                error!(target: "bootstrap", %code, error = %e, "Skipping bank item");
            }
        }

        let students = if cfg.students.is_empty() {
            seed_students()
        } else {
            cfg.students.into_iter().map(|s| Student::new(s.id, s.name)).collect()
        };
        let mut catalog = StudentCatalog::new();
        for student in students {
            let id = student.id().to_string();
            if let Err(e) = validate_student(student.id(), student.name()).and_then(|_| catalog.add(student)) {
                error!(target: "bootstrap", %id, error = %e, "Skipping roster entry");
            }
        }

        let format = match cfg.format.as_deref() {
            None => Format::default(),
            Some(name) => name.parse().unwrap_or_else(|e| {
                error!(target: "bootstrap", format = %name, error = %e, "Unknown roster format; using plain");
                Format::default()
            }),
        };

        let seed = seed_override.or(cfg.seed);
        let counts = database.category_counts();
        info!(
            target: "bootstrap",
            tests = database.count(),
            english = counts.get(Category::English),
            math = counts.get(Category::Math),
            professional = counts.get(Category::Professional),
            students = catalog.len(),
            seeded = seed.is_some(),
            sampling = ?cfg.sampling,
            "Startup inventory"
        );

        let generator = ExamPaperGenerator::new(cfg.quotas, cfg.sampling, seed);
        Self::new(catalog, database, generator, format)
    }

    pub fn quotas(&self) -> &Quotas {
        self.generator.quotas()
    }

    /// Give every student a fresh paper. Failures are logged per student; returns how many succeeded.
    #[instrument(level = "info", skip(self))]
    pub fn generate_all(&mut self) -> usize {
        if self.catalog.is_empty() {
            warn!(target: "generator", "Roster is empty; no papers to generate");
            return 0;
        }
        let mut generated = 0;
        for student in self.catalog.iter_mut() {
            match self.generator.generate(&self.database) {
                Ok(paper) => {
                    student.attach_paper(paper);
                    generated += 1;
                }
                Err(e) => {
                    warn!(target: "generator", id = %student.id(), error = %e, "Paper generation skipped");
                }
            }
        }
        info!(target: "generator", generated, students = self.catalog.len(), "Startup generation finished");
        generated
    }

    /// Draw a new paper and swap it in. On error the previous paper stays attached.
    #[instrument(level = "info", skip(self), fields(%id))]
    pub fn generate_for(&mut self, id: &str) -> Result<()> {
        let student = self.catalog.require_mut(id)?;
        let paper = self.generator.generate(&self.database)?;
        let replaced = student.attach_paper(paper).is_some();
        info!(target: "generator", %id, replaced, "Exam paper generated");
        Ok(())
    }

    /// Spaces are stripped from both fields before validation.
    #[instrument(level = "info", skip(self, name), fields(%id))]
    pub fn add_student(&mut self, id: &str, name: &str) -> Result<()> {
        let id = strip_spaces(id);
        let name = strip_spaces(name);
        validate_student(&id, &name)?;
        self.catalog.add(Student::new(id.clone(), name))?;
        info!(target: "retest", %id, "Student added");
        Ok(())
    }
}

fn validate_student(id: &str, name: &str) -> Result<()> {
    if !is_valid_student_id(id) {
        return Err(RetestError::InvalidStudent { field: "id", value: id.to_string() });
    }
    if !is_valid_student_name(name) {
        return Err(RetestError::InvalidStudent { field: "name", value: name.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExamPaper;

    fn seeded_state() -> AppState {
        AppState::from_config(None, Some(11))
    }

    #[test]
    fn bootstrap_from_seeds() {
        let state = seeded_state();
        assert_eq!(state.database.count(), 30);
        assert_eq!(state.catalog.len(), 20);
        assert_eq!(state.format, Format::Plain);
    }

    #[test]
    fn generate_all_gives_everyone_a_complete_paper() {
        let mut state = seeded_state();
        assert_eq!(state.generate_all(), 20);
        let quotas = *state.quotas();
        assert!(state.catalog.iter().all(|s| s.paper().is_some_and(|p| p.is_complete(&quotas))));
    }

    #[test]
    fn regeneration_replaces_the_paper() {
        let mut state = seeded_state();
        state.generate_for("2019213001").unwrap();
        state
            .catalog
            .require_mut("2019213001")
            .unwrap()
            .paper_mut()
            .unwrap()
            .get_item_mut(0)
            .unwrap()
            .set_score(9.0)
            .unwrap();
        state.generate_for("2019213001").unwrap();
        let paper = state.catalog.require("2019213001").unwrap().paper().unwrap();
        assert_eq!(paper.item_count(), 10);
        assert_eq!(paper.total_score(), 0.0);
    }

    #[test]
    fn generate_for_unknown_student() {
        let mut state = seeded_state();
        assert_eq!(state.generate_for("nope").unwrap_err(), RetestError::NotFound { id: "nope".into() });
    }

    #[test]
    fn failed_generation_attaches_nothing() {
        let cfg = RetestConfig::from_toml_str(
            r#"
[[tests]]
code = "E1"
title = "t"
category = "english"

[[tests]]
code = "E2"
title = "t"
category = "english"
"#,
        )
        .unwrap();
        let mut state = AppState::from_config(Some(cfg), Some(1));
        assert_eq!(state.generate_all(), 0);
        assert!(matches!(
            state.generate_for("2019213001"),
            Err(RetestError::InsufficientPool { available: 2, required: 10 })
        ));
        assert!(state.catalog.iter().all(|s| s.paper().is_none()));
    }

    fn bank_toml(english: usize, math: usize, professional: usize) -> String {
        let mut toml = String::new();
        for (category, n) in [("english", english), ("math", math), ("professional", professional)] {
            for i in 0..n {
                toml.push_str(&format!("[[tests]]\ncode = \"{category}-{i}\"\ntitle = \"t\"\ncategory = \"{category}\"\n\n"));
            }
        }
        toml
    }

    #[test]
    fn category_shortfall_attaches_nothing() {
        let cfg = RetestConfig::from_toml_str(&bank_toml(2, 5, 5)).unwrap();
        let mut state = AppState::from_config(Some(cfg), Some(1));
        assert_eq!(state.database.count(), 12);
        assert_eq!(state.generate_all(), 0);
        assert_eq!(
            state.generate_for("2019213001").unwrap_err(),
            RetestError::InsufficientCategoryPool { category: Category::English, available: 2, required: 3 }
        );
        assert!(state.catalog.iter().all(|s| s.paper().is_none()));
    }

    #[test]
    fn oversized_quotas_are_reported_not_fatal() {
        let cfg = RetestConfig::from_toml_str(
            r#"
[quotas]
english = 9223372036854775807
math = 9223372036854775807
professional = 9223372036854775807
"#,
        )
        .unwrap();
        let mut state = AppState::from_config(Some(cfg), Some(1));
        assert_eq!(state.generate_all(), 0);
        assert!(matches!(
            state.generate_for("2019213001"),
            Err(RetestError::InsufficientPool { available: 30, required: usize::MAX })
        ));
        assert!(state.catalog.iter().all(|s| s.paper().is_none()));
    }

    #[test]
    fn failed_regeneration_keeps_previous_paper() {
        let mut state = seeded_state();
        let student = state.catalog.require_mut("2019213002").unwrap();
        let mut partial = ExamPaper::new();
        partial.add_item(crate::domain::TestItem::new(state.database.get(0).unwrap().clone()));
        student.attach_paper(partial);

        state.generator = ExamPaperGenerator::new(
            Quotas { english: 11, math: 0, professional: 0 },
            Default::default(),
            Some(1),
        );
        assert!(state.generate_for("2019213002").is_err());
        assert_eq!(state.catalog.require("2019213002").unwrap().paper().unwrap().item_count(), 1);
    }

    #[test]
    fn add_student_validates_and_rejects_duplicates() {
        let mut state = seeded_state();
        state.add_student(" 2020 001 ", "Alice").unwrap();
        assert_eq!(state.catalog.get("2020001").map(Student::name), Some("Alice"));

        assert!(matches!(
            state.add_student("2020001", "Bob"),
            Err(RetestError::DuplicateId { .. })
        ));
        assert!(matches!(
            state.add_student("20-20", "Bob"),
            Err(RetestError::InvalidStudent { field: "id", .. })
        ));
        assert!(matches!(
            state.add_student("2020002", "Bob李"),
            Err(RetestError::InvalidStudent { field: "name", .. })
        ));
        assert_eq!(state.catalog.len(), 21);
    }
}
