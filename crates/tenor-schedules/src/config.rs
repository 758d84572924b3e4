//! Schedule generation settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ScheduleError, ScheduleResult};

/// What to do when a tenor is not a whole multiple of the period interval
/// and no stub type was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenorMismatchPolicy {
    /// Fail with `ScheduleError::NonDivisibleTenor`
    #[default]
    Reject,
    /// Log a warning and build the schedule with an automatic final stub
    Tolerate,
}

/// Policy knobs for schedule construction.
///
/// Loadable from TOML:
///
/// ```toml
/// tenor_mismatch = "tolerate"
/// max_merged_period_ratio = 1.75
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Handling of non-divisible tenors without a stub type
    #[serde(default)]
    pub tenor_mismatch: TenorMismatchPolicy,

    /// Longest merged first period accepted when a full first period is
    /// requested, in regular periods. The default of 2.0 admits any
    /// remainder shorter than one regular period.
    #[serde(default = "default_max_merged_period_ratio")]
    pub max_merged_period_ratio: f64,
}

fn default_max_merged_period_ratio() -> f64 {
    2.0
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            tenor_mismatch: TenorMismatchPolicy::default(),
            max_merged_period_ratio: default_max_merged_period_ratio(),
        }
    }
}

impl ScheduleSettings {
    /// Sets the tenor mismatch policy.
    #[must_use]
    pub fn with_tenor_mismatch(mut self, policy: TenorMismatchPolicy) -> Self {
        self.tenor_mismatch = policy;
        self
    }

    /// Sets the merged first period bound.
    #[must_use]
    pub fn with_max_merged_period_ratio(mut self, ratio: f64) -> Self {
        self.max_merged_period_ratio = ratio;
        self
    }

    /// Parses settings from TOML text.
    pub fn from_toml_str(content: &str) -> ScheduleResult<Self> {
        let settings: Self =
            toml::from_str(content).map_err(|e| ScheduleError::config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ScheduleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScheduleError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Checks that the settings are usable.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !self.max_merged_period_ratio.is_finite() || self.max_merged_period_ratio < 1.0 {
            return Err(ScheduleError::config(format!(
                "max_merged_period_ratio must be at least 1.0, got {}",
                self.max_merged_period_ratio
            )));
        }
        Ok(())
    }
}
