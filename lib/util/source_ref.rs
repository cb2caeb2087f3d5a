/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under the MIT license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::Path;

/// Build a `"<filename>:<line>"` reference from the caller's own location
/// plus `offset`. Tests use this to state where a diagnostic must land,
/// independently of the harness's line-mapping arithmetic; the two must
/// agree for an assertion to succeed.
#[track_caller]
pub fn source_ref(offset: i64) -> String {
    let location = std::panic::Location::caller();
    let file = Path::new(location.file())
        .file_name()
        .map_or_else(|| location.file().to_owned(), |x| {
            x.to_string_lossy().into_owned()
        });
    format!("{}:{}", file, location.line() as i64 + offset)
}
