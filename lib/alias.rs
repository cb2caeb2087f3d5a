/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use dupe::Dupe;
use starlark_map::small_map::SmallMap;

use crate::error::RewriteError;
use crate::snippet::Snippet;

static NEXT_PARAM_ID: AtomicU32 = AtomicU32::new(0);

/// A symbolic type parameter with its own identity, mirroring how a checker
/// treats two same-named type variables as distinct objects. Substitution
/// resolves it textually by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    id: u32,
    name: String,
}

impl TypeParam {
    pub fn new(name: &str) -> Self {
        Self {
            id: NEXT_PARAM_ID.fetch_add(1, Ordering::Relaxed),
            name: name.to_owned(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What an alias entry is keyed on: a plain symbol name, or a type parameter
/// carried by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AliasKey {
    Name(String),
    Param(TypeParam),
}

impl AliasKey {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(x) => x,
            Self::Param(x) => x.name(),
        }
    }
}

impl From<&str> for AliasKey {
    fn from(x: &str) -> Self {
        Self::Name(x.to_owned())
    }
}

impl From<TypeParam> for AliasKey {
    fn from(x: TypeParam) -> Self {
        Self::Param(x)
    }
}

/// Mapping from symbolic type placeholders to concrete type expressions,
/// substituted textually before submission. Insertion-ordered; a key with no
/// free occurrence in the snippet is a no-op.
#[derive(Debug, Clone, Default)]
pub struct AliasMap(SmallMap<AliasKey, String>);

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<AliasKey>, replacement: impl Into<String>) {
        self.0.insert(key.into(), replacement.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collapse keys down to identifier -> replacement, rejecting two entries
    /// that would rewrite the same identifier differently.
    fn resolved(&self) -> Result<SmallMap<&str, &str>, RewriteError> {
        let mut res: SmallMap<&str, &str> = SmallMap::new();
        for (key, replacement) in self.0.iter() {
            if replacement.contains('\n') {
                return Err(RewriteError::MultilineReplacement {
                    name: key.name().to_owned(),
                });
            }
            if let Some(prev) = res.insert(key.name(), replacement.as_str()) {
                if prev != replacement.as_str() {
                    return Err(RewriteError::Conflict {
                        name: key.name().to_owned(),
                        first: prev.to_owned(),
                        second: replacement.clone(),
                    });
                }
            }
        }
        Ok(res)
    }
}

/// Tracks whether the scanner is inside a string literal, including
/// triple-quoted strings spanning lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrMode {
    None,
    Single(char),
    Triple(char),
}

/// Replace every free-standing occurrence of each alias symbol with its
/// concrete type expression. Substitution respects identifier boundaries,
/// skips string literals and comments, and is strictly intra-line, so the
/// rewritten snippet always has the same line count as the input.
pub fn rewrite(snippet: &Snippet, aliases: &AliasMap) -> Result<Snippet, RewriteError> {
    if aliases.is_empty() {
        return Ok(snippet.dupe());
    }
    let names = aliases.resolved()?;
    let mut mode = StrMode::None;
    let lines = snippet
        .lines()
        .iter()
        .map(|line| rewrite_line(line, &names, &mut mode))
        .collect::<Vec<_>>();
    debug_assert_eq!(lines.len(), snippet.line_count());
    Ok(Snippet::new(
        snippet.file().to_owned(),
        snippet.start_line(),
        lines,
    ))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn triple_at(chars: &[char], i: usize, quote: char) -> bool {
    chars.len() >= i + 3 && chars[i] == quote && chars[i + 1] == quote && chars[i + 2] == quote
}

fn rewrite_line(line: &str, names: &SmallMap<&str, &str>, mode: &mut StrMode) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < chars.len() {
        match *mode {
            StrMode::Triple(quote) => {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    out.push(chars[i]);
                    out.push(chars[i + 1]);
                    i += 2;
                } else if triple_at(&chars, i, quote) {
                    out.push(quote);
                    out.push(quote);
                    out.push(quote);
                    i += 3;
                    *mode = StrMode::None;
                } else {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            StrMode::Single(quote) => {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    out.push(chars[i]);
                    out.push(chars[i + 1]);
                    i += 2;
                } else {
                    if chars[i] == quote {
                        *mode = StrMode::None;
                    }
                    out.push(chars[i]);
                    i += 1;
                }
            }
            StrMode::None => {
                let c = chars[i];
                if c == '#' {
                    // Comment: the rest of the line is left untouched.
                    out.extend(&chars[i..]);
                    break;
                } else if c == '\'' || c == '"' {
                    if triple_at(&chars, i, c) {
                        out.push(c);
                        out.push(c);
                        out.push(c);
                        i += 3;
                        *mode = StrMode::Triple(c);
                    } else {
                        out.push(c);
                        i += 1;
                        *mode = StrMode::Single(c);
                    }
                } else if is_ident_char(c) {
                    let start = i;
                    while i < chars.len() && is_ident_char(chars[i]) {
                        i += 1;
                    }
                    let token: String = chars[start..i].iter().collect();
                    let starts_like_name = !chars[start].is_ascii_digit();
                    match names.get(token.as_str()) {
                        Some(replacement) if starts_like_name => out.push_str(replacement),
                        _ => out.push_str(&token),
                    }
                } else {
                    out.push(c);
                    i += 1;
                }
            }
        }
    }
    // A single-quoted string cannot continue past the line end.
    if matches!(*mode, StrMode::Single(_)) {
        *mode = StrMode::None;
    }
    out
}
