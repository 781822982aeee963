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

#[cfg(feature = "d3d")]
pub mod d3d;
pub mod dummy;

#[cfg(test)]
mod tests;

#[cfg(feature = "d3d")]
pub use d3d::D3dCompiler;
pub use dummy::Dummy;

use types::{CompileFlags, IncludeType, OpenedInclude, ShaderMacro};

pub type HResult = i32;
pub const S_OK: HResult = 0;
pub const E_FAIL: HResult = 0x80004005_u32 as i32;
pub const E_INVALIDARG: HResult = 0x80070057_u32 as i32;

/// A shader compiler. The compiler itself is opaque: it is handed a source buffer and
/// calls back into an [`IncludeHandler`] while it runs.
pub trait Backend: Sized + std::fmt::Debug + 'static {
    type Instance: BackendInstance<Self>;
    type Error: Error<Self>;

    /// Short lowercase name, as accepted by `TINYFXC_BACKEND`
    const NAME: &'static str;
}

pub trait BackendInstance<B: Backend<Instance = Self>> {
    /// Compiles `descriptor.source`, blocking until the compiler returns.
    ///
    /// Every include opened through `includes` is closed again before this returns,
    /// whether or not compilation succeeded.
    fn compile(
        &mut self,
        descriptor: &CompileDescriptor<'_>,
        includes: &mut dyn IncludeHandler,
    ) -> Result<Vec<u8>, B::Error>;
}

pub trait Error<B: Backend<Error = Self>>: std::error::Error {
    /// The raw status reported by the compiler
    fn status(&self) -> HResult;
    /// Compiler output meant for the user, if there was any
    fn diagnostics(&self) -> Option<&str>;
}

/// Answers the compiler's requests for include files.
pub trait IncludeHandler {
    /// Returns `None` if `name` can't be found
    fn open(&mut self, include_type: IncludeType, name: &str) -> Option<OpenedInclude>;
    fn close(&mut self, include: OpenedInclude);
}

#[derive(Clone, Copy, Debug)]
pub struct CompileDescriptor<'a> {
    pub source: &'a [u8],
    /// Used by the compiler in diagnostics
    pub source_name: Option<&'a str>,
    pub macros: &'a [ShaderMacro],
    pub entry_point: Option<&'a str>,
    pub profile: Option<&'a str>,
    pub flags: CompileFlags,
    /// Effect compiler flags, currently always 0
    pub extra_flags: u32,
}
