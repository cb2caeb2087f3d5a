/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Scripted checker daemons for exercising the harness end to end. Each
//! script speaks the session protocol over stdin/stdout; the responder
//! flags lines by simple content rules, so tests control both ends.

use std::path::PathBuf;

use crate::session::CheckerCommand;
use crate::session::Session;

/// Flags `# E:`/`# N:` marker comments, version- and platform-gated
/// `# E[..]:` markers keyed on the unit's header directives, and the one
/// hardcoded "type rule" `: str = 1`, which lets alias substitution be
/// observed end to end.
const RESPONDER: &str = r##"#!/bin/sh
emit() {
  file="$1"
  ver=$(sed -n '1s/.*=//p' "$file")
  plat=$(sed -n '2s/.*=//p' "$file")
  n=0
  while IFS= read -r line; do
    n=$((n+1))
    case "$line" in
      *"# E: "*) msg="${line##*"# E: "}"; echo "$file:$n: error: $msg" ;;
      *"# N: "*) msg="${line##*"# N: "}"; echo "$file:$n: note: $msg" ;;
      *"# E[$ver]: "*) msg="${line##*"# E[$ver]: "}"; echo "$file:$n: error: $msg" ;;
      *"# E[$plat]: "*) msg="${line##*"# E[$plat]: "}"; echo "$file:$n: error: $msg" ;;
      *": str = 1"*) echo "$file:$n: error: Incompatible types in assignment (expression has type \"int\", variable has type \"str\")" ;;
    esac
  done < "$file"
  echo "== done $2 =="
}
while read -r cmd name path; do
  case "$cmd" in
    exit) exit 0 ;;
    check) emit "$path" "$name" ;;
  esac
done
"##;

/// Records a start in its log, answers exactly one request, then exits, so
/// the next submission finds a dead daemon.
const CRASH_AFTER_ONE: &str = r#"#!/bin/sh
echo started >> "$1"
read -r cmd name path
if [ "$cmd" = "check" ]; then
  echo "== done $name =="
fi
exit 0
"#;

const DEAD: &str = r#"#!/bin/sh
exit 0
"#;

const WEDGED: &str = r#"#!/bin/sh
exec sleep 30
"#;

const STALE: &str = r#"#!/bin/sh
while read -r cmd name path; do
  echo "== done somebody_else =="
done
"#;

pub struct FakeChecker {
    dir: tempfile::TempDir,
    script: PathBuf,
    extra_args: Vec<String>,
}

impl FakeChecker {
    fn write(script_body: &str) -> FakeChecker {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("checker.sh");
        std::fs::write(&script, script_body).unwrap();
        FakeChecker {
            dir,
            script,
            extra_args: Vec::new(),
        }
    }

    pub fn responder() -> FakeChecker {
        Self::write(RESPONDER)
    }

    /// The crash-once checker plus the path of its start log.
    pub fn crash_after_one() -> (FakeChecker, PathBuf) {
        let mut fake = Self::write(CRASH_AFTER_ONE);
        let log = fake.dir.path().join("starts.log");
        fake.extra_args.push(log.to_string_lossy().into_owned());
        (fake, log)
    }

    pub fn dead() -> FakeChecker {
        Self::write(DEAD)
    }

    pub fn wedged() -> FakeChecker {
        Self::write(WEDGED)
    }

    pub fn stale() -> FakeChecker {
        Self::write(STALE)
    }

    pub fn command(&self) -> CheckerCommand {
        let mut command = CheckerCommand::new("sh").arg(self.script.to_string_lossy());
        for arg in &self.extra_args {
            command = command.arg(arg);
        }
        command
    }

    pub fn session(&self) -> Session {
        Session::start(self.command()).unwrap()
    }
}
