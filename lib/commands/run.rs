/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use clap::Subcommand;

pub use crate::commands::check::Args as CheckArgs;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Drive files through one checker daemon session and report diagnostics
    Check(CheckArgs),
}

/// Exit status of a command, if the run is completed.
pub enum CommandExitStatus {
    /// The command completed without an issue.
    Success,
    /// The command completed, but problems (e.g. type errors) were found.
    UserError,
}
