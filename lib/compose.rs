/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::Path;
use std::path::PathBuf;

use crate::error::SessionError;
use crate::metadata::CheckConfig;
use crate::snippet::Snippet;

/// The header is always exactly this many lines, whatever the configuration,
/// so a diagnostic's composed line maps back by constant arithmetic.
pub const HEADER_LINES: usize = 4;

/// A snippet wrapped into a self-contained checkable module: directive
/// comments the checker interprets natively, an import preamble, and the
/// snippet body.
#[derive(Debug, Clone)]
pub struct ComposedUnit {
    name: String,
    text: String,
    snippet: Snippet,
}

fn directive(key: &str, value: Option<String>) -> String {
    format!(
        "# tyassert: {key}={}",
        value.unwrap_or_else(|| "default".to_owned())
    )
}

impl ComposedUnit {
    pub fn new(name: String, snippet: &Snippet, config: &CheckConfig) -> Self {
        let header = [
            directive(
                "python-version",
                config.python_version.map(|v| v.to_string()),
            ),
            directive("platform", config.python_platform.clone()),
            "from typing import *".to_owned(),
            String::new(),
        ];
        debug_assert_eq!(header.len(), HEADER_LINES);
        let mut text = header.join("\n");
        text.push('\n');
        text.push_str(&snippet.to_text());
        Self {
            name,
            text,
            snippet: snippet.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    /// Write the unit as `<scratch>/<name>.py`, where the session will point
    /// the checker at it.
    pub fn write(&self, scratch: &Path) -> Result<PathBuf, SessionError> {
        let path = scratch.join(format!("{}.py", self.name));
        std::fs::write(&path, &self.text).map_err(|source| SessionError::Scratch {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Translate a 1-based line in the composed unit back to the original
    /// source. Lines inside the header clamp to the snippet's first line.
    pub fn map_line(&self, composed_line: usize) -> usize {
        self.snippet.start_line() + composed_line.saturating_sub(HEADER_LINES + 1)
    }
}
