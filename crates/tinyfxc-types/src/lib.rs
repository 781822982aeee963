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
use std::path::PathBuf;

bitflags::bitflags! {
    /// Compiler switches. The bit values are the `D3DCOMPILE_*` constants, so the
    /// raw bits can be handed to the native compiler unchanged.
    ///
    /// Exclusive switches (e.g. both packing orders, several optimization levels)
    /// may be set together; the compiler decides what to do with them.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CompileFlags: u32 {
        const DEBUG = 1 << 0;
        const SKIP_VALIDATION = 1 << 1;
        const SKIP_OPTIMIZATION = 1 << 2;
        const PACK_MATRIX_ROW_MAJOR = 1 << 3;
        const PACK_MATRIX_COLUMN_MAJOR = 1 << 4;
        const PARTIAL_PRECISION = 1 << 5;
        const NO_PRESHADER = 1 << 8;
        const AVOID_FLOW_CONTROL = 1 << 9;
        const ENABLE_STRICTNESS = 1 << 11;
        const ENABLE_BACKWARDS_COMPATIBILITY = 1 << 12;
        const IEEE_STRICTNESS = 1 << 13;
        const OPTIMIZATION_LEVEL0 = 1 << 14;
        /// Level 1 is the compiler default and has no bit of its own
        const OPTIMIZATION_LEVEL1 = 0;
        const OPTIMIZATION_LEVEL2 = (1 << 14) | (1 << 15);
        const OPTIMIZATION_LEVEL3 = 1 << 15;
        const WARNINGS_ARE_ERRORS = 1 << 18;
        const RESOURCES_MAY_ALIAS = 1 << 19;
        const ENABLE_UNBOUNDED_DESCRIPTOR_TABLES = 1 << 20;
        const ALL_RESOURCES_BOUND = 1 << 21;
        const DEBUG_NAME_FOR_SOURCE = 1 << 22;
        const DEBUG_NAME_FOR_BINARY = 1 << 23;
    }
}

/// A preprocessor definition, `name=value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderMacro {
    pub name: String,
    pub value: String,
}
impl ShaderMacro {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything needed for one compiler invocation, as parsed from the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompilationRequest {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub shader_profile: Option<String>,
    pub entry_point: Option<String>,
    /// In command line order. Duplicate names are passed through unchanged
    pub macros: Vec<ShaderMacro>,
    /// Absolute for relative inputs, always ending with a path separator
    pub include_paths: Vec<PathBuf>,
    pub flags: CompileFlags,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IncludeType {
    /// `#include "file"`
    #[default]
    Local,
    /// `#include <file>`
    System,
}
impl IncludeType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Local),
            1 => Some(Self::System),
            _ => None,
        }
    }
}

/// The contents of an include file handed to the compiler.
///
/// Not `Clone`: each opened include is given back to the handler exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct OpenedInclude {
    data: Box<[u8]>,
}
impl OpenedInclude {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Address of the first byte, used to identify buffers lent across FFI
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }
}
