/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Wire protocol between the session and the checker daemon: newline-framed
//! requests on stdin, diagnostics plus an explicit end marker on stdout.
//! The marker names the unit it closes, so a reply can never be attributed
//! to the wrong submission.

use std::path::Path;

use crate::diagnostic::RawDiagnostic;

pub const EXIT_REQUEST: &str = "exit\n";

pub fn check_request(name: &str, path: &Path) -> String {
    format!("check {} {}\n", name, path.display())
}

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Diagnostic(RawDiagnostic),
    Done { name: String },
    Other(String),
}

pub fn parse_reply(line: &str) -> Reply {
    if let Some(name) = line
        .strip_prefix("== done ")
        .and_then(|rest| rest.strip_suffix(" =="))
    {
        Reply::Done {
            name: name.to_owned(),
        }
    } else if let Some(diagnostic) = RawDiagnostic::parse(line) {
        Reply::Diagnostic(diagnostic)
    } else {
        Reply::Other(line.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_check_request_shape() {
        assert_eq!(
            check_request("unit_3", Path::new("/scratch/unit_3.py")),
            "check unit_3 /scratch/unit_3.py\n"
        );
    }

    #[test]
    fn test_parse_done_marker() {
        assert_eq!(
            parse_reply("== done unit_3 =="),
            Reply::Done {
                name: "unit_3".to_owned()
            }
        );
    }

    #[test]
    fn test_parse_diagnostic_line() {
        match parse_reply("/scratch/unit_3.py:6: error: boom") {
            Reply::Diagnostic(d) => assert_eq!(d.line, 6),
            reply => panic!("expected diagnostic, got {reply:?}"),
        }
    }

    #[test]
    fn test_chatter_is_other() {
        assert_eq!(
            parse_reply("warming caches"),
            Reply::Other("warming caches".to_owned())
        );
    }
}
