/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! End-to-end assertions against a scripted checker daemon. Expected
//! locations are stated with `source_ref`, whose arithmetic is independent
//! of the harness's own line mapping; agreement between the two is the
//! offset contract under test.

use pretty_assertions::assert_eq;

use crate::error::HarnessError;
use crate::harness::TypeCheck;
use crate::metadata::PythonVersion;
use crate::test::util::FakeChecker;
use crate::util::source_ref::source_ref;

#[test]
fn test_clean_snippet_type_checks() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    x: int = 1
    return x
"#)?;
    session.assert_type_checks(&snippet)?;
    Ok(())
}

#[test]
fn test_many_snippets_share_one_daemon() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippets = [
        crate::snippet!(r#"
def f():
    pass
"#)?,
        crate::snippet!(r#"
def f() -> int:
    x = 1
    y = 2
    return x + y
"#)?,
        crate::snippet!(r#"
def f() -> str:
    class A:
        def foo(self) -> str: ...
    return A().foo()
"#)?,
    ];
    for snippet in &snippets {
        session.assert_type_checks(snippet)?;
    }
    Ok(())
}

#[test]
fn test_bad_return_reported_at_its_line() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    return 'a'  # E: Incompatible return value type (got "str", expected "int")
"#)?;
    let reference = source_ref(-2);
    let err = session.assert_type_checks(&snippet).unwrap_err();
    assert!(matches!(err, HarnessError::Assertion(_)));
    let message = err.to_string();
    assert!(
        message.contains(&format!("{reference}: error: Incompatible return value type")),
        "unexpected assertion message: {message}"
    );
    Ok(())
}

#[test]
fn test_alias_substitution_controls_the_verdict() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    x: T = 1
    return x
"#)?;
    let reference = source_ref(-3);
    TypeCheck::new()
        .alias("T", "int")
        .assert_type_checks(&mut session, &snippet)?;
    let err = TypeCheck::new()
        .alias("T", "str")
        .assert_type_checks(&mut session, &snippet)
        .unwrap_err();
    assert!(
        err.to_string().contains(&format!("{reference}: error:")),
        "unexpected assertion message: {err}"
    );
    Ok(())
}

#[test]
fn test_alias_by_type_param_identity() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let param = crate::alias::TypeParam::new("T");
    let snippet = crate::snippet!(r#"
def f() -> int:
    x: T = 1
    return x
"#)?;
    TypeCheck::new()
        .alias(param.clone(), "int")
        .assert_type_checks(&mut session, &snippet)?;
    let err = TypeCheck::new()
        .alias(param, "str")
        .assert_type_checks(&mut session, &snippet)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Assertion(_)));
    Ok(())
}

#[test]
fn test_version_gated_branches() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
import sys
if sys.version_info > (3, 7):
    new_branch = 1  # E[3.10]: Incompatible return value type (got "str", expected "int")
else:
    old_branch = 1  # E[3.6]: Incompatible return value type (got "str", expected "int")
"#)?;
    let new_line = snippet.start_line() + 2;
    let old_line = snippet.start_line() + 4;

    let verdict = TypeCheck::new()
        .python_version(PythonVersion::new(3, 10, 0))
        .check(&mut session, &snippet)?;
    assert_eq!(verdict.errors().len(), 1);
    assert_eq!(verdict.errors()[0].line, new_line);

    let verdict = TypeCheck::new()
        .python_version(PythonVersion::new(3, 6, 0))
        .check(&mut session, &snippet)?;
    assert_eq!(verdict.errors().len(), 1);
    assert_eq!(verdict.errors()[0].line, old_line);

    // With no version set the daemon sees the placeholder directive and
    // neither gated marker applies.
    session.assert_type_checks(&snippet)?;
    Ok(())
}

#[test]
fn test_platform_gated_branches() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
import sys
if sys.platform == 'win32':
    win_branch = 1  # E[win32]: Incompatible return value type (got "str", expected "int")
else:
    posix_branch = 1  # E[linux]: Incompatible return value type (got "str", expected "int")
"#)?;
    let win_line = snippet.start_line() + 2;
    let linux_line = snippet.start_line() + 4;

    let verdict = TypeCheck::new()
        .platform("win32")
        .check(&mut session, &snippet)?;
    assert_eq!(verdict.errors().len(), 1);
    assert_eq!(verdict.errors()[0].line, win_line);

    let verdict = TypeCheck::new()
        .platform("linux")
        .check(&mut session, &snippet)?;
    assert_eq!(verdict.errors().len(), 1);
    assert_eq!(verdict.errors()[0].line, linux_line);
    Ok(())
}

#[test]
fn test_mapped_line_invariant_under_configuration() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    return 'a'  # E: boom
"#)?;
    let expected_line = snippet.start_line() + 1;
    let configurations = [
        TypeCheck::new(),
        TypeCheck::new().python_version(PythonVersion::new(3, 6, 0)),
        TypeCheck::new().platform("win32"),
        TypeCheck::new()
            .python_version(PythonVersion::new(3, 10, 2))
            .platform("linux")
            .alias("Unused", "int"),
    ];
    for options in configurations {
        let verdict = options.check(&mut session, &snippet)?;
        assert_eq!(verdict.errors().len(), 1);
        assert_eq!(verdict.errors()[0].line, expected_line);
    }
    Ok(())
}

#[test]
fn test_resubmission_is_idempotent() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    return 'a'  # E: boom
"#)?;
    let first = TypeCheck::new().check(&mut session, &snippet)?;
    let second = TypeCheck::new().check(&mut session, &snippet)?;
    assert_eq!(first.diagnostics(), second.diagnostics());
    Ok(())
}

#[test]
fn test_submissions_are_isolated() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let failing = crate::snippet!(r#"
def f() -> int:
    return 'a'  # E: boom
"#)?;
    let clean = crate::snippet!(r#"
def g() -> int:
    return 1
"#)?;
    let verdict = TypeCheck::new().check(&mut session, &failing)?;
    assert_eq!(verdict.errors().len(), 1);
    let verdict = TypeCheck::new().check(&mut session, &clean)?;
    assert!(verdict.diagnostics().is_empty());
    session.assert_type_checks(&clean)?;
    Ok(())
}

#[test]
fn test_expected_failure_with_pattern() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    return 'a'  # E: Incompatible return value type (got "str", expected "int")
"#)?;
    let reference = source_ref(-2);
    session.assert_type_errors(
        &snippet,
        Some(&format!("{}: error:", regex::escape(&reference))),
    )?;
    Ok(())
}

#[test]
fn test_expected_failure_on_clean_snippet() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    return 1
"#)?;
    let err = session.assert_type_errors(&snippet, None).unwrap_err();
    assert!(
        err.to_string().contains("unexpectedly type checked"),
        "unexpected assertion message: {err}"
    );
    Ok(())
}

#[test]
fn test_notes_do_not_fail_the_snippet() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let snippet = crate::snippet!(r#"
def f() -> int:
    return 1  # N: see overload
"#)?;
    let verdict = TypeCheck::new().check(&mut session, &snippet)?;
    assert_eq!(verdict.diagnostics().len(), 1);
    assert!(verdict.is_pass());
    session.assert_type_checks(&snippet)?;
    Ok(())
}

#[test]
fn test_single_shot_assertion() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let snippet = crate::snippet!(r#"
def f() -> int:
    return 1
"#)?;
    crate::harness::assert_type_checks_once(fake.command(), &TypeCheck::new(), &snippet)?;
    let failing = crate::snippet!(r#"
def f() -> int:
    return 'a'  # E: boom
"#)?;
    crate::harness::assert_type_errors_once(
        fake.command(),
        &TypeCheck::new(),
        &failing,
        Some("error: boom"),
    )?;
    Ok(())
}

#[test]
fn test_function_extracted_from_file() -> anyhow::Result<()> {
    let fake = FakeChecker::responder();
    let mut session = fake.session();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("module.py");
    std::fs::write(
        &path,
        "CONST = 1\n\n\ndef target() -> int:\n    bad: str = 1\n    return bad\n",
    )?;
    let snippet = crate::snippet::Snippet::from_function(&path, "target")?;
    assert_eq!(snippet.start_line(), 4);
    let verdict = TypeCheck::new().check(&mut session, &snippet)?;
    assert_eq!(verdict.errors().len(), 1);
    assert_eq!(verdict.errors()[0].file, "module.py");
    assert_eq!(verdict.errors()[0].line, 5);
    Ok(())
}
