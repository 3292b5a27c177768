//! Shared newtypes and enums used across all domain modules.
//!
//! The id newtypes are serialization-transparent: they serialize/deserialize
//! as plain JSON strings, so they can be used directly in snapshot types and
//! in the persisted preferences blob without conversion overhead.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ─── CityId ──────────────────────────────────────────────────────────────────

/// Newtype for city identifiers (e.g. `"2643743"` for London).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(String);

impl CityId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for CityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CityId(s.to_string()))
    }
}

// ─── AssetId ─────────────────────────────────────────────────────────────────

/// Newtype for crypto asset identifiers (e.g. `"bitcoin"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for AssetId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AssetId(s.to_string()))
    }
}

// ─── Severity ────────────────────────────────────────────────────────────────

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{s}")
    }
}

// ─── Theme ───────────────────────────────────────────────────────────────────

/// UI theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_id_serde() {
        let id = CityId::from("2643743");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"2643743\"");
        let back: CityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_asset_id_serde() {
        let id = AssetId::from("bitcoin");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bitcoin\"");
    }

    #[test]
    fn test_severity_serde() {
        let s: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(s, Severity::Warning);
        assert_eq!(serde_json::to_string(&Severity::Success).unwrap(), "\"success\"");
    }

    #[test]
    fn test_theme_serde_and_default() {
        let t: Theme = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(t, Theme::Dark);
        assert_eq!(Theme::default(), Theme::System);
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), "\"system\"");
    }
}
