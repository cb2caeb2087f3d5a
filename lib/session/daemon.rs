/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::process::Child;
use std::process::ChildStdin;
use std::process::Command;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::unbounded;
use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use tracing::debug;

use crate::error::SessionError;
use crate::session::protocol::EXIT_REQUEST;
use crate::session::CheckerCommand;

pub enum Received {
    Line(String),
    TimedOut,
    /// The daemon's stdout reached EOF: it exited or closed the pipe.
    Closed,
}

/// The live checker process. A reader thread drains stdout into a channel so
/// the session can wait for replies with a timeout.
pub struct Daemon {
    child: Child,
    stdin: ChildStdin,
    replies: Receiver<String>,
    reader: Option<thread::JoinHandle<()>>,
}

impl Daemon {
    pub fn spawn(command: &CheckerCommand) -> Result<Daemon, SessionError> {
        debug!("spawning checker: {} {:?}", command.program(), command.args());
        let mut child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SessionError::Spawn {
                command: command.program().to_owned(),
                source,
            })?;
        let stdin = child.stdin.take().unwrap();
        let stdout = child.stdout.take().unwrap();
        let (sender, replies) = unbounded();
        let reader = thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                if sender.send(line).is_err() {
                    break;
                }
            }
        });
        Ok(Daemon {
            child,
            stdin,
            replies,
            reader: Some(reader),
        })
    }

    pub fn send(&mut self, request: &str) -> std::io::Result<()> {
        self.stdin.write_all(request.as_bytes())?;
        self.stdin.flush()
    }

    pub fn recv(&mut self, timeout: Duration) -> Received {
        match self.replies.recv_timeout(timeout) {
            Ok(line) => Received::Line(line),
            Err(RecvTimeoutError::Timeout) => Received::TimedOut,
            Err(RecvTimeoutError::Disconnected) => Received::Closed,
        }
    }

    /// Ask the daemon to exit, then kill it if it outlives the grace period.
    pub fn graceful_exit(&mut self, grace: Duration) {
        let _ = self.send(EXIT_REQUEST);
        let deadline = Instant::now() + grace;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(10));
                }
                _ => {
                    self.kill();
                    break;
                }
            }
        }
        self.join_reader();
    }

    pub fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.join_reader();
    }

    fn join_reader(&mut self) {
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        self.kill();
    }
}
