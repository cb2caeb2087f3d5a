/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

#![warn(clippy::all)]
#![allow(clippy::module_inception)]
#![deny(clippy::cloned_instead_of_copied)]
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::str_to_string)]
#![deny(clippy::string_to_string)]
#![deny(clippy::trivially_copy_pass_by_ref)]

pub mod alias;
pub mod commands;
pub mod compose;
pub mod diagnostic;
pub mod error;
pub mod expectation;
pub mod harness;
pub mod metadata;
pub mod session;
pub mod snippet;
mod test;
pub mod util;
pub mod verdict;

pub use crate::alias::AliasKey;
pub use crate::alias::AliasMap;
pub use crate::alias::TypeParam;
pub use crate::error::HarnessError;
pub use crate::harness::assert_type_checks_once;
pub use crate::harness::assert_type_errors_once;
pub use crate::harness::TypeCheck;
pub use crate::metadata::PythonVersion;
pub use crate::session::CheckerCommand;
pub use crate::session::Session;
pub use crate::snippet::Snippet;
pub use crate::util::args::clap_env;
pub use crate::util::args::get_args_expanded;
pub use crate::util::source_ref::source_ref;
pub use crate::util::trace::init_tracing;
pub use crate::verdict::Verdict;
