/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::diagnostic::Diagnostic;

/// Expected errors declared inline in a checked file with `# E:` comments.
/// Every declared error must be reported on its line, and no undeclared
/// error may appear.
#[derive(Clone, Debug)]
pub struct Expectation {
    file: String,
    errors: Vec<(usize, String)>,
}

impl Expectation {
    fn parse_line(&mut self, line_no: usize, mut s: &str) {
        while let Some((prefix, err)) = s.trim().rsplit_once("# E:") {
            self.errors.push((line_no, err.trim().to_owned()));
            s = prefix.trim_end();
        }
    }

    pub fn parse(file: &str, contents: &str) -> Self {
        let mut res = Self {
            file: file.to_owned(),
            errors: Vec::new(),
        };
        for (line_no, line) in contents.lines().enumerate() {
            res.parse_line(line_no + 1, line);
        }
        res
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `errors` must be the error-severity diagnostics, already mapped back
    /// to the file the expectations were parsed from.
    pub fn check(&self, errors: &[&Diagnostic]) -> anyhow::Result<()> {
        if self.errors.len() != errors.len() {
            anyhow::bail!(
                "Expectations failed for {}: expected {} errors, but got {}",
                self.file,
                self.errors.len(),
                errors.len(),
            );
        }
        for (line_no, msg) in &self.errors {
            if !errors
                .iter()
                .any(|e| e.message.contains(msg) && e.line == *line_no)
            {
                anyhow::bail!(
                    "Expectations failed for {}: can't find error (line {line_no}): {msg}",
                    self.file
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::diagnostic::Severity;

    use super::*;

    fn diagnostic(line: usize, message: &str) -> Diagnostic {
        Diagnostic {
            file: "main.py".to_owned(),
            line,
            severity: Severity::Error,
            message: message.to_owned(),
        }
    }

    #[test]
    fn test_parse_collects_lines() {
        let e = Expectation::parse("main.py", "x = 1\ny: int = 'a'  # E: bad assign\n");
        assert_eq!(e.errors, vec![(2, "bad assign".to_owned())]);
    }

    #[test]
    fn test_check_matches_by_line_and_substring() {
        let e = Expectation::parse("main.py", "y: int = 'a'  # E: bad assign\n");
        let d = diagnostic(1, "bad assign to y");
        assert!(e.check(&[&d]).is_ok());
    }

    #[test]
    fn test_check_rejects_count_mismatch() {
        let e = Expectation::parse("main.py", "x = 1\n");
        let d = diagnostic(1, "unexpected");
        assert!(e.check(&[&d]).is_err());
    }

    #[test]
    fn test_check_rejects_wrong_line() {
        let e = Expectation::parse("main.py", "y: int = 'a'  # E: bad assign\n");
        let d = diagnostic(3, "bad assign");
        assert!(e.check(&[&d]).is_err());
    }
}
