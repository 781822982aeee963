/* BEGIN LICENSE
  tinyfxc, a small fxc-compatible shader compiler front end.
  Copyright (C) 2025 SupaMaggie70 (Magnus Larsson)


  tinyfxc is free software; you can redistribute it and/or
  modify it under the terms of the GNU General Public License
  as published by the Free Software Foundation; either version 3
  of the License, or (at your option) any later version.

  tinyfxc is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
END LICENSE */
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use backend::IncludeHandler;
use types::{IncludeType, OpenedInclude};

/// Looks up include files in a list of directories. The first directory containing the
/// file wins. Nothing is cached, every lookup reads the file again.
#[derive(Debug)]
pub struct IncludeResolver<'a> {
    /// Each ends with a path separator
    search_paths: &'a [PathBuf],
    outstanding: usize,
}
impl<'a> IncludeResolver<'a> {
    pub fn new(search_paths: &'a [PathBuf]) -> Self {
        Self {
            search_paths,
            outstanding: 0,
        }
    }
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self)))]
    pub fn resolve(&mut self, name: &str) -> Option<OpenedInclude> {
        for dir in self.search_paths {
            let mut candidate = dir.clone().into_os_string();
            candidate.push(name);
            let candidate = Path::new(&candidate);
            log::debug!("shader compile include path: {}", candidate.display());
            let Ok(mut file) = File::open(candidate) else {
                continue;
            };
            // Directories can be opened on some platforms
            let len = match file.metadata() {
                Ok(metadata) if metadata.is_file() => metadata.len(),
                _ => continue,
            };
            let mut data = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
            if let Err(e) = file.read_to_end(&mut data) {
                log::warn!("Failed to read include {}: {e}", candidate.display());
                return None;
            }
            log::trace!(
                "Resolved {name} to {} ({} bytes)",
                candidate.display(),
                data.len()
            );
            self.outstanding += 1;
            return Some(OpenedInclude::new(data));
        }
        None
    }
    pub fn release(&mut self, include: OpenedInclude) {
        self.outstanding = self.outstanding.saturating_sub(1);
        drop(include);
    }
    /// Number of includes resolved but not yet released
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}
impl IncludeHandler for IncludeResolver<'_> {
    fn open(&mut self, _include_type: IncludeType, name: &str) -> Option<OpenedInclude> {
        self.resolve(name)
    }
    fn close(&mut self, include: OpenedInclude) {
        self.release(include);
    }
}
impl Drop for IncludeResolver<'_> {
    fn drop(&mut self) {
        if self.outstanding != 0 {
            log::warn!("{} include(s) were never released", self.outstanding);
        }
    }
}
