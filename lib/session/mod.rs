/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

pub mod daemon;
pub mod protocol;

use std::path::Path;
use std::time::Duration;
use std::time::Instant;

use tracing::debug;
use tracing::warn;

use crate::compose::ComposedUnit;
use crate::diagnostic::RawDiagnostic;
use crate::error::SessionError;
use crate::session::daemon::Daemon;
use crate::session::daemon::Received;
use crate::session::protocol::check_request;
use crate::session::protocol::Reply;

/// How to launch the external checker daemon.
#[derive(Debug, Clone)]
pub struct CheckerCommand {
    program: String,
    args: Vec<String>,
}

impl CheckerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// One checker daemon, reused across every submission of a test session.
/// Submissions are strictly sequential; the daemon is torn down exactly once,
/// on `stop` or on drop, whichever comes first.
pub struct Session {
    command: CheckerCommand,
    daemon: Option<Daemon>,
    scratch: tempfile::TempDir,
    submit_timeout: Duration,
    shutdown_grace: Duration,
    units: usize,
}

impl Session {
    /// Launch the daemon. Spawn failure is fatal here rather than deferred to
    /// the first submission.
    pub fn start(command: CheckerCommand) -> Result<Session, SessionError> {
        let scratch = tempfile::tempdir().map_err(|source| SessionError::Scratch {
            path: std::env::temp_dir(),
            source,
        })?;
        let daemon = Daemon::spawn(&command)?;
        Ok(Session {
            command,
            daemon: Some(daemon),
            scratch,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            units: 0,
        })
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub(crate) fn next_unit_name(&mut self) -> String {
        self.units += 1;
        format!("unit_{}", self.units)
    }

    /// Submit one composed unit and collect its diagnostics. A crashed or
    /// unresponsive daemon gets one transparent restart; a second failure
    /// surfaces. Ambiguous output (missing or mismatched end marker) is a
    /// `SessionError`, never an empty result.
    pub fn submit(&mut self, unit: &ComposedUnit) -> Result<Vec<RawDiagnostic>, SessionError> {
        let path = unit.write(self.scratch.path())?;
        if self.daemon.is_none() {
            self.daemon = Some(Daemon::spawn(&self.command)?);
        }
        match self.submit_once(unit, &path) {
            Ok(diagnostics) => Ok(diagnostics),
            Err(e) if e.is_restartable() => {
                warn!("checker failed ({e}), restarting once");
                self.restart()?;
                self.submit_once(unit, &path)
            }
            Err(e) => Err(e),
        }
    }

    fn submit_once(
        &mut self,
        unit: &ComposedUnit,
        path: &Path,
    ) -> Result<Vec<RawDiagnostic>, SessionError> {
        let daemon = self
            .daemon
            .as_mut()
            .ok_or_else(|| SessionError::Crashed {
                unit: unit.name().to_owned(),
            })?;
        if daemon.send(&check_request(unit.name(), path)).is_err() {
            return Err(SessionError::Crashed {
                unit: unit.name().to_owned(),
            });
        }
        let deadline = Instant::now() + self.submit_timeout;
        let mut diagnostics = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match daemon.recv(remaining) {
                Received::Line(line) => match protocol::parse_reply(&line) {
                    Reply::Done { name } if name == unit.name() => return Ok(diagnostics),
                    Reply::Done { name } => {
                        return Err(SessionError::StaleReply {
                            unit: unit.name().to_owned(),
                            got: name,
                        });
                    }
                    Reply::Diagnostic(d) => diagnostics.push(d),
                    Reply::Other(line) => debug!("checker: {line}"),
                },
                Received::Closed => {
                    return Err(SessionError::Crashed {
                        unit: unit.name().to_owned(),
                    });
                }
                Received::TimedOut => {
                    return Err(SessionError::Timeout {
                        unit: unit.name().to_owned(),
                        timeout: self.submit_timeout,
                    });
                }
            }
        }
    }

    fn restart(&mut self) -> Result<(), SessionError> {
        if let Some(mut daemon) = self.daemon.take() {
            daemon.kill();
        }
        self.daemon = Some(Daemon::spawn(&self.command)?);
        Ok(())
    }

    /// Shut the daemon down: ask it to exit, then kill after the grace
    /// period. Safe to call more than once; drop calls it too.
    pub fn stop(&mut self) {
        if let Some(mut daemon) = self.daemon.take() {
            daemon.graceful_exit(self.shutdown_grace);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
