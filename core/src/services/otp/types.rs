//! Types for passcode verification diagnostics

use serde::Serialize;

/// Why a verification was denied. Logged only, never returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// Claimed code is not six digits
    MalformedCode,
    /// No record stored for the pair
    NotFound,
    CodeMismatch,
    AlreadyUsed,
    Expired,
    /// Record looked active on re-read; another caller consumed or replaced it
    Contended,
    /// Diagnostic lookup itself failed
    Unknown,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::MalformedCode => "malformed_code",
            DenialReason::NotFound => "not_found",
            DenialReason::CodeMismatch => "code_mismatch",
            DenialReason::AlreadyUsed => "already_used",
            DenialReason::Expired => "expired",
            DenialReason::Contended => "contended",
            DenialReason::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
