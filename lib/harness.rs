/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::alias;
use crate::alias::AliasKey;
use crate::alias::AliasMap;
use crate::compose::ComposedUnit;
use crate::error::HarnessError;
use crate::metadata::CheckConfig;
use crate::metadata::PythonVersion;
use crate::session::CheckerCommand;
use crate::session::Session;
use crate::snippet::Snippet;
use crate::verdict;
use crate::verdict::Verdict;

/// Options for one assertion: symbolic type substitutions and the target
/// version/platform the checker should analyze for. The explicit `check`
/// call is the core operation; the `assert_*` methods are the convenience
/// layer on top of it.
#[derive(Debug, Clone, Default)]
pub struct TypeCheck {
    aliases: AliasMap,
    config: CheckConfig,
}

impl TypeCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias(mut self, key: impl Into<AliasKey>, replacement: impl Into<String>) -> Self {
        self.aliases.insert(key, replacement);
        self
    }

    pub fn aliases(mut self, aliases: AliasMap) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn python_version(mut self, version: PythonVersion) -> Self {
        self.config.python_version = Some(version);
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.config.python_platform = Some(platform.into());
        self
    }

    /// Rewrite, compose, submit, and map: the full pipeline for one snippet,
    /// producing its verdict without judging it.
    pub fn check(&self, session: &mut Session, snippet: &Snippet) -> Result<Verdict, HarnessError> {
        let rewritten = alias::rewrite(snippet, &self.aliases)?;
        let unit = ComposedUnit::new(session.next_unit_name(), &rewritten, &self.config);
        let raw = session.submit(&unit)?;
        Ok(Verdict::new(&unit, &raw))
    }

    /// Assert the snippet type checks cleanly.
    pub fn assert_type_checks(
        &self,
        session: &mut Session,
        snippet: &Snippet,
    ) -> Result<(), HarnessError> {
        let verdict = self.check(session, snippet)?;
        verdict::expect_pass(&verdict)?;
        Ok(())
    }

    /// Assert the checker rejects the snippet; `pattern`, when given, must
    /// match at least one mapped diagnostic.
    pub fn assert_type_errors(
        &self,
        session: &mut Session,
        snippet: &Snippet,
        pattern: Option<&str>,
    ) -> Result<(), HarnessError> {
        let verdict = self.check(session, snippet)?;
        verdict::expect_errors(&verdict, &snippet.to_string(), pattern)?;
        Ok(())
    }
}

impl Session {
    /// Default-configuration assertion that `snippet` type checks.
    pub fn assert_type_checks(&mut self, snippet: &Snippet) -> Result<(), HarnessError> {
        TypeCheck::new().assert_type_checks(self, snippet)
    }

    /// Default-configuration assertion that `snippet` is rejected.
    pub fn assert_type_errors(
        &mut self,
        snippet: &Snippet,
        pattern: Option<&str>,
    ) -> Result<(), HarnessError> {
        TypeCheck::new().assert_type_errors(self, snippet, pattern)
    }
}

/// Single-shot form: spin up a daemon for one snippet and tear it down
/// again. The session form amortizes daemon startup across assertions; this
/// trades that away for convenience.
pub fn assert_type_checks_once(
    command: CheckerCommand,
    options: &TypeCheck,
    snippet: &Snippet,
) -> Result<(), HarnessError> {
    let mut session = Session::start(command)?;
    options.assert_type_checks(&mut session, snippet)
}

pub fn assert_type_errors_once(
    command: CheckerCommand,
    options: &TypeCheck,
    snippet: &Snippet,
    pattern: Option<&str>,
) -> Result<(), HarnessError> {
    let mut session = Session::start(command)?;
    options.assert_type_errors(&mut session, snippet, pattern)
}
