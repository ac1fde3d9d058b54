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

use crate::error::SetupError;

pub fn get_exit_code(error: &SetupError) -> i32 {
    match error {
        SetupError::MissingConfig(_) | SetupError::InvalidConfig(_) | SetupError::Config(_) => 2,

        SetupError::ExecutableNotFound { .. } => 5,

        SetupError::Extract { .. } => 6,

        SetupError::Io(io_err) if io_err.kind() == std::io::ErrorKind::PermissionDenied => 13,

        SetupError::Download { .. } | SetupError::Http(_) | SetupError::ReleaseLookup(_) => 20,

        _ => 1,
    }
}
