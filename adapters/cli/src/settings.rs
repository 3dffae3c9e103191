//! Loading of the `ricochet.toml` settings file.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use ricochet_core::UserId;
use ricochet_store::StoreSettings;
use ricochet_system_round_generation::GenerationSettings;
use ricochet_system_scoring::{NoOpPolicy, ScoringSettings};
use serde::Deserialize;

/// Settings file version understood by this binary.
const SUPPORTED_SETTINGS_VERSION: u32 = 1;

/// Runtime settings assembled from the settings file and built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) generation: GenerationSettings,
    pub(crate) scoring: ScoringSettings,
    pub(crate) store: StoreSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    version: u32,
    #[serde(default)]
    generation: GenerationSection,
    #[serde(default)]
    scoring: ScoringSection,
    #[serde(default)]
    store: StoreSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerationSection {
    max_placement_attempts: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScoringSection {
    no_op_moves: Option<NoOpMoves>,
    conflict_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreSection {
    baseline_author: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NoOpMoves {
    Reject,
    Count,
}

impl From<NoOpMoves> for NoOpPolicy {
    fn from(value: NoOpMoves) -> Self {
        match value {
            NoOpMoves::Reject => NoOpPolicy::Reject,
            NoOpMoves::Count => NoOpPolicy::Count,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file is absent.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let file: SettingsFile =
            toml::from_str(contents).context("failed to parse settings toml contents")?;

        if file.version != SUPPORTED_SETTINGS_VERSION {
            bail!(
                "unsupported settings version {}; expected {}",
                file.version,
                SUPPORTED_SETTINGS_VERSION
            );
        }

        let mut settings = Self::default();
        if let Some(attempts) = file.generation.max_placement_attempts {
            if attempts == 0 {
                bail!("generation.max_placement_attempts must be at least 1");
            }
            settings.generation.max_placement_attempts = attempts;
        }
        if let Some(policy) = file.scoring.no_op_moves {
            settings.scoring.no_op_moves = policy.into();
        }
        if let Some(retries) = file.scoring.conflict_retries {
            settings.scoring.conflict_retries = retries;
        }
        if let Some(author) = file.store.baseline_author {
            if author.trim().is_empty() {
                bail!("store.baseline_author must not be empty");
            }
            settings.store.baseline_author = UserId::new(author);
        }
        Ok(settings)
    }
}
