use thiserror::Error;

use crate::types::Type;

/// Stable error codes, prefixed by phase: R = resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    R001, // no function, variable or cast chain matches
    R002, // more than one equally valid resolution
    R003, // identifier not among the declared variables
    R004, // numeric literal cannot be parsed
    R005, // name declared twice in one custom uniform set
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::R001 => "R001",
            Self::R002 => "R002",
            Self::R003 => "R003",
            Self::R004 => "R004",
            Self::R005 => "R005",
        }
    }
}

// ─── Resolution ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    /// `trace` holds every attempted branch when debug tracing is enabled,
    /// here and in `Ambiguous`.
    #[error("cannot resolve `{expression}` as `{target}`")]
    Unresolved {
        target:     Type,
        expression: String,
        trace:      Vec<String>,
    },

    #[error("`{name}` is ambiguous as `{target}`: {}", .candidates.join(" | "))]
    Ambiguous {
        name:       String,
        target:     Type,
        candidates: Vec<String>,
        trace:      Vec<String>,
    },

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("invalid number literal `{0}`")]
    NumberFormat(String),
}

impl ResolutionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unresolved { .. }   => ErrorCode::R001,
            Self::Ambiguous { .. }    => ErrorCode::R002,
            Self::UnknownVariable(_)  => ErrorCode::R003,
            Self::NumberFormat(_)     => ErrorCode::R004,
        }
    }
}

// ─── Declarations ─────────────────────────────────────────────────────────────

/// A custom uniform or variable that failed to load. The rest of the set
/// still loads; this declaration is left out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeclarationError {
    #[error("[{}] `{name}`: {source}", .source.code().as_str())]
    Resolution {
        name:   String,
        #[source]
        source: ResolutionError,
    },

    #[error("[R005] `{0}` is already declared")]
    Duplicate(String),
}

impl DeclarationError {
    pub fn name(&self) -> &str {
        match self {
            Self::Resolution { name, .. } => name,
            Self::Duplicate(name)         => name,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Resolution { source, .. } => source.code(),
            Self::Duplicate(_)              => ErrorCode::R005,
        }
    }
}
