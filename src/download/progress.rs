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

use super::ProgressReporter;
use log::{debug, info};

/// Reports download progress through the logger in 25% steps.
///
/// CI logs are not terminals, so a redrawn progress bar would only add noise.
#[derive(Debug)]
pub struct LogProgressReporter {
    label: String,
    total_bytes: u64,
    next_quarter: u64,
}

impl LogProgressReporter {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            total_bytes: 0,
            next_quarter: 1,
        }
    }

    pub(crate) fn percent(&self, bytes_downloaded: u64) -> Option<u64> {
        if self.total_bytes == 0 {
            None
        } else {
            Some(bytes_downloaded.saturating_mul(100) / self.total_bytes)
        }
    }
}

impl ProgressReporter for LogProgressReporter {
    fn on_start(&mut self, total_bytes: u64) {
        self.total_bytes = total_bytes;
        self.next_quarter = 1;
        if total_bytes > 0 {
            info!("Downloading {} ({total_bytes} bytes)", self.label);
        } else {
            info!("Downloading {}", self.label);
        }
    }

    fn on_progress(&mut self, bytes_downloaded: u64) {
        if let Some(percent) = self.percent(bytes_downloaded) {
            while self.next_quarter <= 3 && percent >= self.next_quarter * 25 {
                debug!("{}: {}% downloaded", self.label, self.next_quarter * 25);
                self.next_quarter += 1;
            }
        }
    }

    fn on_complete(&mut self) {
        debug!("Download of {} complete", self.label);
    }
}
