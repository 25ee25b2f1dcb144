#![forbid(unsafe_code)]

//! Policy-as-data configuration for the navigation engine.
//!
//! Collects every tunable of the tracker, the dispatcher and the style
//! driver into one [`NavPolicyConfig`] that can be loaded from TOML or JSON
//! at startup.
//!
//! ```toml
//! # scrollnav.toml
//! [tracker]
//! threshold = 0.3
//!
//! [dispatcher]
//! root_margin = "-20% 0px"
//! hero_id = "product-section-0"
//!
//! [style]
//! scroll_end = 120.0
//! ```
//!
//! ```rust,ignore
//! let policy = NavPolicyConfig::from_toml_file("scrollnav.toml")?;
//! let tracker = SectionActivationTracker::new(observer, policy.to_tracker_config()?);
//! ```
//!
//! # Defaults
//!
//! Every default equals the value the components use on their own, so
//! `NavPolicyConfig::default()` changes nothing.

#[cfg(feature = "policy-config")]
use std::path::Path;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use scrollnav_core::RootMargin;
use scrollnav_style::{InputRange, NavStyleInterpolator};

use crate::dispatcher::DispatcherConfig;
use crate::products::NAV_HEIGHT_PX;
use crate::tracker::TrackerConfig;

/// Top-level navigation policy.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct NavPolicyConfig {
    pub tracker: TrackerPolicy,
    pub dispatcher: DispatcherPolicy,
    pub style: StylePolicy,
}

/// Section activation tracker parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TrackerPolicy {
    /// Observer threshold. Default: 0.3.
    pub threshold: f64,
    /// CSS root margin. Default: `"0px"`.
    pub root_margin: String,
}

impl Default for TrackerPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            root_margin: "0px".to_owned(),
        }
    }
}

/// Product dispatcher parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct DispatcherPolicy {
    /// Observer threshold and minimum winning ratio. Default: 0.3.
    pub threshold: f64,
    /// CSS root margin. Default: `"-20% 0px"`.
    pub root_margin: String,
    /// Hero element id. Default: `"product-section-0"`.
    pub hero_id: String,
    /// Product block id suffix. Default: `"-section"`.
    pub section_suffix: String,
    /// Fixed nav height subtracted from link scroll targets (px). Default: 96.
    pub nav_height: f64,
}

impl Default for DispatcherPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            root_margin: "-20% 0px".to_owned(),
            hero_id: "product-section-0".to_owned(),
            section_suffix: "-section".to_owned(),
            nav_height: NAV_HEIGHT_PX,
        }
    }
}

/// Style interpolation range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct StylePolicy {
    /// Offset where every transition starts (px). Default: 0.
    pub scroll_start: f64,
    /// Offset where every transition ends (px). Default: 100.
    pub scroll_end: f64,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self {
            scroll_start: 0.0,
            scroll_end: 100.0,
        }
    }
}

impl NavPolicyConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every parameter. An empty list means the policy is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        check_threshold(&mut errors, "tracker.threshold", self.tracker.threshold);
        check_margin(&mut errors, "tracker.root_margin", &self.tracker.root_margin);

        let d = &self.dispatcher;
        check_threshold(&mut errors, "dispatcher.threshold", d.threshold);
        check_margin(&mut errors, "dispatcher.root_margin", &d.root_margin);
        if d.hero_id.trim().is_empty() {
            errors.push("dispatcher.hero_id must not be empty".into());
        }
        if d.section_suffix.is_empty() {
            errors.push("dispatcher.section_suffix must not be empty".into());
        }
        if !d.nav_height.is_finite() || d.nav_height < 0.0 {
            errors.push(format!(
                "dispatcher.nav_height must be finite and >= 0, got {}",
                d.nav_height
            ));
        }

        if let Err(e) = InputRange::new(self.style.scroll_start, self.style.scroll_end) {
            errors.push(format!("style: {e}"));
        }

        errors
    }

    /// Validate, returning every problem at once.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build a [`TrackerConfig`] from this policy.
    pub fn to_tracker_config(&self) -> Result<TrackerConfig, ConfigError> {
        Ok(TrackerConfig {
            threshold: self.tracker.threshold,
            root_margin: parse_margin("tracker.root_margin", &self.tracker.root_margin)?,
        })
    }

    /// Build a [`DispatcherConfig`] from this policy.
    pub fn to_dispatcher_config(&self) -> Result<DispatcherConfig, ConfigError> {
        let d = &self.dispatcher;
        Ok(DispatcherConfig {
            threshold: d.threshold,
            root_margin: parse_margin("dispatcher.root_margin", &d.root_margin)?,
            hero_id: d.hero_id.clone(),
            section_suffix: d.section_suffix.clone(),
        })
    }

    /// Build the style interpolator for this policy's scroll range.
    pub fn to_style_interpolator(&self) -> Result<NavStyleInterpolator, ConfigError> {
        InputRange::new(self.style.scroll_start, self.style.scroll_end)
            .map(NavStyleInterpolator::new)
            .map_err(|e| ConfigError::Validation(vec![format!("style: {e}")]))
    }
}

fn check_threshold(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(format!("{name} must be in [0, 1], got {value}"));
    }
}

fn check_margin(errors: &mut Vec<String>, name: &str, value: &str) {
    if let Err(e) = RootMargin::parse(value) {
        errors.push(format!("{name}: {e}"));
    }
}

fn parse_margin(name: &str, value: &str) -> Result<RootMargin, ConfigError> {
    RootMargin::parse(value).map_err(|e| ConfigError::Validation(vec![format!("{name}: {e}")]))
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a navigation policy.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_component_defaults() {
        let policy = NavPolicyConfig::default();
        assert!(policy.validate().is_empty());
        assert_eq!(policy.to_tracker_config().ok(), Some(TrackerConfig::default()));
        assert_eq!(
            policy.to_dispatcher_config().ok(),
            Some(DispatcherConfig::default())
        );
        assert_eq!(
            policy.to_style_interpolator().ok(),
            Some(NavStyleInterpolator::default())
        );
    }

    #[test]
    fn validate_catches_bad_threshold() {
        let mut policy = NavPolicyConfig::default();
        policy.tracker.threshold = 1.5;
        policy.dispatcher.threshold = f64::NAN;
        let errors = policy.validate();
        assert!(errors.iter().any(|e| e.contains("tracker.threshold")));
        assert!(errors.iter().any(|e| e.contains("dispatcher.threshold")));
    }

    #[test]
    fn validate_catches_bad_margin() {
        let mut policy = NavPolicyConfig::default();
        policy.dispatcher.root_margin = "-20% 0px 1em".into();
        let errors = policy.validate();
        assert!(errors.iter().any(|e| e.contains("dispatcher.root_margin")));
        assert!(matches!(
            policy.to_dispatcher_config(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_catches_empty_range() {
        let mut policy = NavPolicyConfig::default();
        policy.style.scroll_end = 0.0;
        let errors = policy.validate();
        assert!(errors.iter().any(|e| e.starts_with("style:")));
        assert!(policy.to_style_interpolator().is_err());
    }

    #[test]
    fn validated_reports_all_problems() {
        let mut policy = NavPolicyConfig::default();
        policy.dispatcher.hero_id = " ".into();
        policy.dispatcher.nav_height = -1.0;
        match policy.validated() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn error_display() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }
}
