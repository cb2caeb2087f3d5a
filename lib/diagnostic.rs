/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Note,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic exactly as the checker reported it, with composed-unit
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDiagnostic {
    pub file: String,
    pub line: usize,
    pub column: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl RawDiagnostic {
    /// Parse a `path:line[:column]: severity: message` line. Lines that do
    /// not have this shape are checker chatter, not diagnostics.
    pub fn parse(line: &str) -> Option<RawDiagnostic> {
        let pattern = Regex::new(r"^(.*?):(\d+)(?::(\d+))?: (error|note): (.*)$").unwrap();
        let captures = pattern.captures(line)?;
        let severity = match captures.get(4).unwrap().as_str() {
            "error" => Severity::Error,
            _ => Severity::Note,
        };
        Some(RawDiagnostic {
            file: captures.get(1).unwrap().as_str().to_owned(),
            line: captures.get(2).unwrap().as_str().parse().ok()?,
            column: captures.get(3).and_then(|x| x.as_str().parse().ok()),
            severity,
            message: captures.get(5).unwrap().as_str().to_owned(),
        })
    }
}

/// A diagnostic translated back onto the original source: `file` is the
/// snippet's file and `line` the line the author actually wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.line, self.severity, self.message
        )
    }
}
