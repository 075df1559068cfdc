//! Plano (floor plan) naming
//!
//! A plano name scopes every device query and selects the floor-plan image
//! served by the backend, so it must be safe to embed in a URL path.

use plano_core::{EditorError, EditorResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Maximum length of a plano name
pub const MAX_PLANO_NAME_LEN: usize = 64;

fn plano_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap_or_else(|_| unreachable!())
    })
}

/// Validated name of a floor plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlanoName(String);

impl PlanoName {
    /// Validate and wrap a plano name
    pub fn new(name: impl Into<String>) -> EditorResult<Self> {
        let name = name.into();
        let invalid = |message: &str| EditorError::InvalidPlanoName {
            name: name.clone(),
            message: message.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if name.len() > MAX_PLANO_NAME_LEN {
            return Err(invalid("name is too long"));
        }
        if !plano_name_pattern().is_match(&name) {
            return Err(invalid(
                "only letters, digits, '_', '-' and '.' are allowed, starting with a letter or digit",
            ));
        }
        if name.contains("..") {
            return Err(invalid("name must not contain '..'"));
        }
        Ok(Self(name))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the floor-plan SVG relative to the backend root
    pub fn surface_path(&self) -> String {
        format!("/static/svg/{}.svg", self.0)
    }
}

impl Default for PlanoName {
    fn default() -> Self {
        Self("plano".to_string())
    }
}

impl TryFrom<String> for PlanoName {
    type Error = EditorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PlanoName::new(value)
    }
}

impl std::str::FromStr for PlanoName {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanoName::new(s)
    }
}

impl From<PlanoName> for String {
    fn from(value: PlanoName) -> Self {
        value.0
    }
}

impl AsRef<str> for PlanoName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlanoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["plano", "planta-baja", "edificio_2", "p1.v2"] {
            assert!(PlanoName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "../etc", "a/b", "-lead", "with space", "a..b"] {
            let err = PlanoName::new(name).unwrap_err();
            assert!(err.is_validation(), "{name} should be rejected");
        }
        assert!(PlanoName::new("x".repeat(MAX_PLANO_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_surface_path() {
        let name: PlanoName = "planta-baja".parse().unwrap();
        assert_eq!(name.surface_path(), "/static/svg/planta-baja.svg");
        assert_eq!(PlanoName::default().surface_path(), "/static/svg/plano.svg");
    }

    #[test]
    fn test_serde() {
        let name: PlanoName = serde_json::from_str("\"oficina\"").unwrap();
        assert_eq!(name.as_str(), "oficina");
        assert!(serde_json::from_str::<PlanoName>("\"../x\"").is_err());
    }
}
