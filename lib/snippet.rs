/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use dupe::Dupe;

use crate::error::ExtractionError;

/// Capture a Python snippet together with its true source origin.
///
/// The literal must open with a newline (write it as `r#"` followed by the
/// code on the next line), so the first body line sits exactly one line below
/// the macro invocation.
#[macro_export]
macro_rules! snippet {
    ($contents:literal) => {
        $crate::snippet::Snippet::from_literal($contents, file!(), line!())
    };
}

/// The literal source of one checkable snippet: which file it came from,
/// the 1-based line its body starts on, and the de-indented body lines.
/// Immutable once extracted; line count equals the span it covers in the
/// original file.
#[derive(Debug, Clone, Dupe)]
pub struct Snippet(Arc<SnippetInner>);

#[derive(Debug)]
struct SnippetInner {
    file: String,
    start_line: usize,
    lines: Vec<String>,
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file(), self.start_line())
    }
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_owned(), |x| x.to_string_lossy().into_owned())
}

/// Strip the longest common whitespace prefix of all non-blank lines.
/// Never changes the number of lines.
fn dedent(lines: &[String]) -> Vec<String> {
    let mut prefix: Option<&str> = None;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let indent_len = line.len() - line.trim_start().len();
        let indent = &line[..indent_len];
        prefix = Some(match prefix {
            None => indent,
            Some(prev) => {
                let common = prev
                    .chars()
                    .zip(indent.chars())
                    .take_while(|(a, b)| a == b)
                    .count();
                &prev[..common.min(indent_len)]
            }
        });
    }
    let prefix = prefix.unwrap_or("");
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                line[prefix.len()..].to_owned()
            }
        })
        .collect()
}

fn is_def_of(line: &str, name: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("async def ")
        .or_else(|| trimmed.strip_prefix("def "));
    match rest {
        Some(rest) => rest.trim_start().strip_prefix(name).is_some_and(|after| {
            after.starts_with('(')
        }),
        None => false,
    }
}

impl Snippet {
    pub(crate) fn new(file: String, start_line: usize, lines: Vec<String>) -> Self {
        Self(Arc::new(SnippetInner {
            file,
            start_line,
            lines,
        }))
    }

    /// Should only be used through the `snippet!` macro, which supplies the
    /// call site's `file!()` and `line!()`.
    pub fn from_literal(
        contents: &str,
        file: &str,
        line: u32,
    ) -> Result<Snippet, ExtractionError> {
        let Some(body) = contents.strip_prefix('\n') else {
            return Err(ExtractionError::MalformedLiteral {
                file: base_name(file),
                line,
            });
        };
        let mut lines: Vec<String> = body.split('\n').map(str::to_owned).collect();
        if lines.last().is_some_and(|x| x.trim().is_empty()) {
            lines.pop();
        }
        Ok(Self::new(
            base_name(file),
            line as usize + 1,
            dedent(&lines),
        ))
    }

    /// Extract the body of `def name(...)` from a real file. The captured
    /// span starts at the `def` line; decorator lines above it invoke test
    /// machinery rather than checkable code and are left out. The body runs
    /// through the last line indented deeper than the `def`.
    pub fn from_function(path: &Path, name: &str) -> Result<Snippet, ExtractionError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ExtractionError::Io {
            path: path.to_owned(),
            source,
        })?;
        let all: Vec<&str> = contents.lines().collect();
        let def_index =
            all.iter()
                .position(|line| is_def_of(line, name))
                .ok_or_else(|| ExtractionError::FunctionNotFound {
                    name: name.to_owned(),
                    path: path.to_owned(),
                })?;
        let def_indent = all[def_index].len() - all[def_index].trim_start().len();
        let mut end = def_index + 1;
        let mut last_code = def_index;
        while end < all.len() {
            let line = all[end];
            if line.trim().is_empty() {
                end += 1;
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            if indent <= def_indent {
                break;
            }
            last_code = end;
            end += 1;
        }
        let lines: Vec<String> = all[def_index..=last_code]
            .iter()
            .map(|x| (*x).to_owned())
            .collect();
        Ok(Self::new(
            base_name(&path.to_string_lossy()),
            def_index + 1,
            dedent(&lines),
        ))
    }

    /// A whole file as one snippet, body starting at line 1. Used when the
    /// unit of checking is the file itself rather than a single function.
    pub fn from_source(file: &str, contents: &str) -> Snippet {
        let mut lines: Vec<String> = contents.split('\n').map(str::to_owned).collect();
        if lines.last().is_some_and(|x| x.is_empty()) {
            lines.pop();
        }
        Self::new(base_name(file), 1, lines)
    }

    pub fn file(&self) -> &str {
        &self.0.file
    }

    /// 1-based line number of the first body line in the original file.
    pub fn start_line(&self) -> usize {
        self.0.start_line
    }

    pub fn lines(&self) -> &[String] {
        &self.0.lines
    }

    pub fn line_count(&self) -> usize {
        self.0.lines.len()
    }

    pub fn to_text(&self) -> String {
        let mut text = self.0.lines.join("\n");
        text.push('\n');
        text
    }
}
