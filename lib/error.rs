/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The snippet source could not be located or was not usable as written.
/// A test-authoring problem, never retried.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no function `{name}` found in `{path}`")]
    FunctionNotFound { name: String, path: PathBuf },
    #[error("snippet literal at {file}:{line} must open with a newline so its first line number is known")]
    MalformedLiteral { file: String, line: u32 },
}

/// Alias substitution could not be performed unambiguously.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("aliases for `{name}` disagree: `{first}` vs `{second}`")]
    Conflict {
        name: String,
        first: String,
        second: String,
    },
    #[error("replacement for `{name}` spans multiple lines")]
    MultilineReplacement { name: String },
}

/// The checker daemon failed to start, crashed, or stopped responding.
/// Never downgraded to a verdict.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to spawn checker `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("checker exited while `{unit}` was being checked")]
    Crashed { unit: String },
    #[error("no response for `{unit}` within {timeout:?}")]
    Timeout { unit: String, timeout: Duration },
    #[error("checker replied out of order for `{unit}`: got end marker for `{got}`")]
    StaleReply { unit: String, got: String },
    #[error("could not write composed unit `{path}`: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Failures after which one transparent daemon restart is attempted.
    pub fn is_restartable(&self) -> bool {
        matches!(self, Self::Crashed { .. } | Self::Timeout { .. })
    }
}

/// Expected vs. actual verdict mismatch. The message always embeds the mapped
/// original-source location and the checker's literal text.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// Umbrella for everything the harness can raise. Extraction, rewrite and
/// session failures mean no trustworthy verdict was produced; only
/// `Assertion` means the snippet's verdict disagreed with the expectation.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}
