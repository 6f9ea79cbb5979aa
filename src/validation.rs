//! The off / warn / strict policy every public operation honours.
//!
//! Normalizers stay pure and mode-agnostic. The few places that must decide
//! between "forward untouched", "log and drop" and "raise" do so through the
//! helpers on [`ValidationMode`], which keeps the decision identical across the
//! list, search and update call sites.

use std::{fmt, str::FromStr, time::Duration};

use tracing::warn;

use crate::error::{LexiconError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Forward caller input without inspecting it.
    Off,
    /// Drop invalid input with a logged warning and continue (or abort with a
    /// failure sentinel when the whole input is unusable).
    #[default]
    Warn,
    /// Raise on any invalid input; nothing partial is ever sent.
    Strict,
}

/// What the caller should do after a structural check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep going with the caller's input as-is (off mode).
    Proceed,
    /// Return the operation's failure sentinel without touching the network.
    Abort,
}

impl ValidationMode {
    pub const ALL: [ValidationMode; 3] = [
        ValidationMode::Off,
        ValidationMode::Warn,
        ValidationMode::Strict,
    ];

    pub fn is_off(self) -> bool {
        self == ValidationMode::Off
    }

    /// Applies the mode to a top-level input that failed validation.
    pub fn reject(self, message: impl Into<String>) -> Result<Verdict> {
        match self {
            ValidationMode::Off => Ok(Verdict::Proceed),
            ValidationMode::Warn => {
                warn!("{}", message.into());
                Ok(Verdict::Abort)
            }
            ValidationMode::Strict => Err(LexiconError::Validation(message.into())),
        }
    }

    /// Reports per-field problems collected by a composite normalizer.
    ///
    /// Strict raises on the first non-empty bucket; warn logs it so partial
    /// application stays auditable and lets the call continue with the valid
    /// subset.
    pub fn report(self, label: &str, problems: &[String]) -> Result<()> {
        if problems.is_empty() {
            return Ok(());
        }
        match self {
            ValidationMode::Strict => Err(LexiconError::Validation(format!(
                "{label}: {}",
                problems.join("; ")
            ))),
            _ => {
                warn!("Skipping {}: {}", label.to_lowercase(), problems.join("; "));
                Ok(())
            }
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationMode::Off => "off",
            ValidationMode::Warn => "warn",
            ValidationMode::Strict => "strict",
        };
        f.write_str(s)
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(ValidationMode::Off),
            "warn" => Ok(ValidationMode::Warn),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(format!(
                "invalid validation mode '{other}'; expected off, warn or strict"
            )),
        }
    }
}

/// Per-call knobs threaded through every façade operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub validation: ValidationMode,
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new(validation: ValidationMode) -> Self {
        Self {
            validation,
            timeout: None,
        }
    }

    pub fn off() -> Self {
        Self::new(ValidationMode::Off)
    }

    pub fn strict() -> Self {
        Self::new(ValidationMode::Strict)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Same timeout, different mode. Used when a façade delegates to another
    /// operation with input it already validated.
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }
}

impl From<ValidationMode> for CallOptions {
    fn from(validation: ValidationMode) -> Self {
        Self::new(validation)
    }
}
