// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily yield every regular file under `root` whose file name is `name`.
///
/// Traversal is depth-first (pre-order) and the entries of each directory are
/// visited in lexicographic file-name order, so the sequence is the same for
/// the same tree on every call. Unreadable entries are skipped.
pub fn named_files<'a>(root: &Path, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(move |entry| entry.file_type().is_file() && entry.file_name() == OsStr::new(name))
        .map(|entry| entry.into_path())
}

/// First file named `name` in [`named_files`] order.
pub fn find_by_name(root: &Path, name: &str) -> Option<PathBuf> {
    named_files(root, name).next()
}
