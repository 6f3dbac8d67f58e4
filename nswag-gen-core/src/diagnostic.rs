//! Per-file failure reports for the build host.

use std::{error::Error, fmt};

/// How serious a [`Diagnostic`] is. Generation failures are always
/// errors; problems the host can work around are logged instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
        })
    }
}

/// A structured report of one configuration file that failed to
/// generate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    /// A stable identifier for the failure.
    pub id: &'static str,
    pub severity: Severity,
    /// The error and all its causes.
    pub message: String,
}

impl Diagnostic {
    /// The identifier for every generation failure.
    pub const GENERATION_FAILED: &'static str = "NSG0001";

    /// Reports `err` as a generation failure, joining its source chain
    /// into the message.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            id: Self::GENERATION_FAILED,
            severity: Severity::Error,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.id, self.message)
    }
}
