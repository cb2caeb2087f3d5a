/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use clap::ValueEnum;
use serde::Serialize;
use tracing::error;
use tracing::info;

use crate::commands::run::CommandExitStatus;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::Severity;
use crate::expectation::Expectation;
use crate::harness::TypeCheck;
use crate::metadata::PythonVersion;
use crate::session::CheckerCommand;
use crate::session::Session;
use crate::snippet::Snippet;
use crate::util::args::clap_env;
use crate::util::fs_anyhow;

#[derive(Debug, Clone, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// Python files to submit, each as its own isolated unit.
    files: Vec<PathBuf>,
    /// Program to launch as the checker daemon.
    #[clap(long, env = clap_env("CHECKER"))]
    checker: String,
    /// Extra argument for the checker daemon (may be repeated).
    #[clap(long, env = clap_env("CHECKER_ARG"))]
    checker_arg: Vec<String>,
    #[clap(long, env = clap_env("PYTHON_VERSION"))]
    python_version: Option<PythonVersion>,
    #[clap(long, env = clap_env("PLATFORM"))]
    platform: Option<String>,
    /// Write the diagnostics to a file, instead of printing them.
    #[arg(long, short = 'o', env = clap_env("OUTPUT"))]
    output: Option<PathBuf>,
    #[clap(long, value_enum, default_value_t, env = clap_env("OUTPUT_FORMAT"))]
    output_format: OutputFormat,
    /// Check against any `# E:` lines in the files.
    #[clap(long, env = clap_env("EXPECTATIONS"))]
    expectations: bool,
    /// Per-submission timeout, in seconds.
    #[clap(long, env = clap_env("SUBMIT_TIMEOUT"))]
    submit_timeout: Option<u64>,
}

#[derive(Serialize, Debug)]
struct JsonDiagnostic<'a> {
    file: &'a str,
    line: usize,
    severity: &'a str,
    message: &'a str,
}

#[derive(Serialize, Debug)]
struct JsonDiagnostics<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

impl OutputFormat {
    fn write_text_to_file(path: &Path, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        for d in diagnostics {
            writeln!(file, "{d}")?;
        }
        file.flush()?;
        Ok(())
    }

    fn write_json_to_file(path: &Path, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        fn f(path: &Path, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
            let report = JsonDiagnostics {
                diagnostics: diagnostics
                    .iter()
                    .map(|d| JsonDiagnostic {
                        file: &d.file,
                        line: d.line,
                        severity: d.severity.as_str(),
                        message: &d.message,
                    })
                    .collect(),
            };
            let mut file = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut file, &report)?;
            Ok(file.flush()?)
        }
        f(path, diagnostics)
            .with_context(|| format!("while writing JSON diagnostics to `{}`", path.display()))
    }

    fn write_to_file(&self, path: &Path, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        match self {
            Self::Text => Self::write_text_to_file(path, diagnostics),
            Self::Json => Self::write_json_to_file(path, diagnostics),
        }
    }
}

impl Args {
    pub fn run(self) -> anyhow::Result<CommandExitStatus> {
        if self.files.is_empty() {
            return Ok(CommandExitStatus::Success);
        }
        let mut command = CheckerCommand::new(&self.checker);
        for arg in &self.checker_arg {
            command = command.arg(arg);
        }
        let mut session = Session::start(command)?;
        if let Some(secs) = self.submit_timeout {
            session = session.with_submit_timeout(Duration::from_secs(secs));
        }
        let mut options = TypeCheck::new();
        if let Some(version) = self.python_version {
            options = options.python_version(version);
        }
        if let Some(platform) = &self.platform {
            options = options.platform(platform.clone());
        }

        let mut all = Vec::new();
        for file in &self.files {
            let contents = fs_anyhow::read_to_string(file)?;
            let snippet = Snippet::from_source(&file.to_string_lossy(), &contents);
            let verdict = options.check(&mut session, &snippet)?;
            if self.expectations {
                Expectation::parse(snippet.file(), &contents).check(&verdict.errors())?;
            }
            all.extend(verdict.diagnostics().iter().cloned());
        }

        let error_count = all
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        if let Some(path) = &self.output {
            self.output_format.write_to_file(path, &all)?;
        } else {
            for d in &all {
                error!("{d}");
            }
        }
        info!(
            "{} diagnostics ({} errors), {} files",
            all.len(),
            error_count,
            self.files.len()
        );
        if self.expectations || error_count == 0 {
            Ok(CommandExitStatus::Success)
        } else {
            Ok(CommandExitStatus::UserError)
        }
    }
}
