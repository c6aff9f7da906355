//! Loading the retest configuration (bank, roster, quotas, sampling) from TOML.
//!
//! See `RetestConfig` and `TestCfg` for expected schema.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Category, Quotas, Test, TestKind};
use crate::error::{Result, RetestError};
use crate::generator::SamplingPolicy;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct RetestConfig {
  #[serde(default)] pub seed: Option<u64>,
  #[serde(default)] pub format: Option<String>,
  #[serde(default)] pub sampling: SamplingPolicy,
  #[serde(default)] pub quotas: Quotas,
  #[serde(default)] pub tests: Vec<TestCfg>,
  #[serde(default)] pub students: Vec<StudentCfg>,
}

/// Test entry accepted in TOML configuration.
/// Only the fields of the entry's own category are read.
#[derive(Clone, Debug, Deserialize)]
pub struct TestCfg {
  pub code: String,
  pub title: String,
  #[serde(default)] pub difficulty: u32,
  #[serde(default)] pub criteria: String,
  pub category: Category,
  // english
  #[serde(default)] pub direction: Option<String>,
  // math / professional
  #[serde(default)] pub image: Option<String>,
  #[serde(default)] pub steps: Option<String>,
  // professional
  #[serde(default)] pub requirements: Option<String>,
  #[serde(default)] pub reference_code: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StudentCfg {
  pub id: String,
  pub name: String,
}

impl TestCfg {
  pub fn into_test(self) -> Test {
    let or_no = |v: Option<String>| v.unwrap_or_else(|| "no".into());
    let image = self.image.unwrap_or_else(|| "no image".into());
    let kind = match self.category {
      Category::English => TestKind::English { direction: or_no(self.direction) },
      Category::Math => TestKind::Math { image, steps: or_no(self.steps) },
      Category::Professional => TestKind::Professional {
        requirements: or_no(self.requirements),
        reference_code: or_no(self.reference_code),
        image,
      },
    };
    Test { code: self.code, title: self.title, difficulty: self.difficulty, criteria: self.criteria, kind }
  }
}

impl RetestConfig {
  pub fn from_toml_str(s: &str) -> Result<Self> {
    toml::from_str(s).map_err(|e| RetestError::Config(e.to_string()))
  }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<RetestConfig> {
  let path = path.as_ref();
  let s = std::fs::read_to_string(path)
    .map_err(|e| RetestError::Config(format!("{}: {}", path.display(), e)))?;
  RetestConfig::from_toml_str(&s)
}

/// Attempt to load `RetestConfig` from RETEST_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<RetestConfig> {
  let path = std::env::var("RETEST_CONFIG_PATH").ok()?;
  match load_config(&path) {
    Ok(cfg) => {
      info!(target: "bootstrap", %path, tests = cfg.tests.len(), students = cfg.students.len(), "Loaded retest config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: "bootstrap", %path, error = %e, "Failed to load TOML config");
      None
    }
  }
}

/// RETEST_SEED wins over the seed written in the config file.
pub fn seed_from_env() -> Option<u64> {
  let raw = std::env::var("RETEST_SEED").ok()?;
  match raw.trim().parse() {
    Ok(seed) => Some(seed),
    Err(e) => {
      error!(target: "bootstrap", %raw, error = %e, "Ignoring unparsable RETEST_SEED");
      None
    }
  }
}
