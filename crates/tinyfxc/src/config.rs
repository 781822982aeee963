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
//! Environment driven settings. Everything else comes from the command line.

use backend::{Backend, Dummy};
use types::CompilationRequest;

use crate::{FxcError, compile::run};

/// env_logger filter
pub const LOG_ENV: &str = "TINYFXC_LOG";
/// `d3d` or `dummy`
pub const BACKEND_ENV: &str = "TINYFXC_BACKEND";
/// Name or path of the compiler library
pub const D3DCOMPILER_ENV: &str = "TINYFXC_D3DCOMPILER";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Dummy,
    #[cfg(feature = "d3d")]
    D3d,
}
impl Default for BackendKind {
    fn default() -> Self {
        #[cfg(feature = "d3d")]
        {
            Self::D3d
        }
        #[cfg(not(feature = "d3d"))]
        {
            Self::Dummy
        }
    }
}
impl BackendKind {
    pub fn from_name(name: &str) -> Result<Self, FxcError> {
        match name.to_ascii_lowercase().as_str() {
            n if n == Dummy::NAME => Ok(Self::Dummy),
            #[cfg(feature = "d3d")]
            n if n == backend::D3dCompiler::NAME => Ok(Self::D3d),
            _ => Err(FxcError::UnknownBackend(name.to_owned())),
        }
    }
    pub fn from_env() -> Result<Self, FxcError> {
        match std::env::var(BACKEND_ENV) {
            Ok(name) if !name.is_empty() => Self::from_name(&name),
            _ => Ok(Self::default()),
        }
    }
    pub fn run(self, request: &CompilationRequest) -> Result<(), FxcError> {
        log::debug!("Using the {self:?} backend");
        match self {
            Self::Dummy => run::<Dummy>(request, Dummy::create_instance),
            #[cfg(feature = "d3d")]
            Self::D3d => {
                let library = std::env::var_os(D3DCOMPILER_ENV)
                    .unwrap_or_else(|| backend::d3d::DEFAULT_LIBRARY.into());
                run::<backend::D3dCompiler>(request, || {
                    backend::D3dCompiler::create_instance(&library)
                })
            }
        }
    }
}
