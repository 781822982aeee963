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
//! A small fxc replacement. Arguments are parsed the way fxc parses them, then handed
//! to a shader compiler backend, usually `D3DCompile` from `d3dcompiler_47.dll`.

pub mod args;
pub mod compile;
pub mod config;
mod error;
mod include;

#[cfg(test)]
mod tests;

pub use backend;
pub use types;

pub use args::parse_args;
pub use compile::{compile_from_args, exit_code, run};
pub use config::BackendKind;
pub use error::{ErrorCode, FxcError};
pub use include::IncludeResolver;
