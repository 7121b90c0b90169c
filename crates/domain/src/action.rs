//! Actions: the logical targets the door is driven towards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::line::{LineValue, UnknownToken};

/// Desired state of an actuator.
///
/// The relays are active-low: `open` drives the line to `0`, `close` to `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Open,
    Close,
}

impl Action {
    /// Line value that realises this action.
    #[must_use]
    pub fn line_value(self) -> LineValue {
        match self {
            Self::Open => LineValue::Low,
            Self::Close => LineValue::High,
        }
    }

    /// Action represented by a line value.
    #[must_use]
    pub fn from_line_value(value: LineValue) -> Self {
        match value {
            LineValue::Low => Self::Open,
            LineValue::High => Self::Close,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            other => Err(UnknownToken(other.to_string())),
        }
    }
}

/// Whether the door follows the schedule or a manual override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Auto,
    Manual,
}

impl Mode {
    /// Mode implied by an optional override.
    #[must_use]
    pub fn of(forced: Option<Action>) -> Self {
        if forced.is_some() {
            Self::Manual
        } else {
            Self::Auto
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
