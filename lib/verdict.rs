/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::Path;

use itertools::Itertools;
use regex::Regex;

use crate::compose::ComposedUnit;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::RawDiagnostic;
use crate::diagnostic::Severity;
use crate::error::AssertionError;

/// The outcome of one submission: the checker's diagnostics, already mapped
/// back onto the original source. Pass means no error-severity diagnostic.
#[derive(Debug, Clone)]
pub struct Verdict {
    diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    /// Map raw diagnostics through the unit's constant header offset.
    /// Diagnostics for other files (imports, earlier units) are not part of
    /// this unit's verdict.
    pub fn new(unit: &ComposedUnit, raw: &[RawDiagnostic]) -> Verdict {
        let diagnostics = raw
            .iter()
            .filter(|d| {
                Path::new(&d.file)
                    .file_stem()
                    .is_some_and(|stem| stem.to_str() == Some(unit.name()))
            })
            .map(|d| Diagnostic {
                file: unit.snippet().file().to_owned(),
                line: unit.map_line(d.line),
                severity: d.severity,
                message: d.message.clone(),
            })
            .collect();
        Verdict { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    pub fn is_pass(&self) -> bool {
        self.errors().is_empty()
    }
}

fn listed(diagnostics: &[&Diagnostic]) -> String {
    diagnostics.iter().map(|d| format!("  {d}")).join("\n")
}

/// The snippet was expected to type check cleanly.
pub fn expect_pass(verdict: &Verdict) -> Result<(), AssertionError> {
    let errors = verdict.errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AssertionError::new(format!(
            "snippet failed to type check:\n{}",
            listed(&errors)
        )))
    }
}

/// The snippet was expected to be rejected; `pattern`, when given, is a regex
/// searched against each mapped `file:line: severity: message` rendering.
pub fn expect_errors(
    verdict: &Verdict,
    origin: &str,
    pattern: Option<&str>,
) -> Result<(), AssertionError> {
    if verdict.is_pass() {
        return Err(AssertionError::new(format!(
            "snippet at {origin} unexpectedly type checked"
        )));
    }
    if let Some(pattern) = pattern {
        let regex = Regex::new(pattern).map_err(|e| {
            AssertionError::new(format!("bad expected-diagnostic pattern `{pattern}`: {e}"))
        })?;
        let all: Vec<&Diagnostic> = verdict.diagnostics().iter().collect();
        if !all.iter().any(|d| regex.is_match(&d.to_string())) {
            return Err(AssertionError::new(format!(
                "no diagnostic matched `{pattern}`, got:\n{}",
                listed(&all)
            )));
        }
    }
    Ok(())
}
