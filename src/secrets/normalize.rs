//! Secret name normalization.
//!
//! The same mode is applied to declared keys when the identifier index is built
//! and to caller-supplied names on lookup, so matching is consistent per manager.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Canonicalization rule for secret names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameNormalization {
    /// Names are matched exactly as declared
    #[default]
    None,
    Lowercase,
    Uppercase,
}

impl NameNormalization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
        }
    }

    /// Canonicalize `name`. Borrows when no transform is configured.
    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::None => Cow::Borrowed(name),
            Self::Lowercase => Cow::Owned(name.to_lowercase()),
            Self::Uppercase => Cow::Owned(name.to_uppercase()),
        }
    }
}

impl FromStr for NameNormalization {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "lowercase" | "lower" => Ok(Self::Lowercase),
            "uppercase" | "upper" => Ok(Self::Uppercase),
            other => Err(format!(
                "Unknown name normalization '{}': expected none, lowercase or uppercase",
                other
            )),
        }
    }
}

impl fmt::Display for NameNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
