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
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use backend::HResult;
use thiserror::Error;

/// Process exit status
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    None = 0,
    InvalidShaderProfile = 1,
    InvalidShaderDefine = 2,
    InvalidArgument = 3,
    InvalidEntryName = 4,
    InvalidIncludePath = 5,
    InvalidInputPath = 6,
    InvalidOutputPath = 7,
    ShaderCompileFailed = 100,
}
impl From<ErrorCode> for ExitCode {
    fn from(code: ErrorCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Error, Debug)]
pub enum FxcError {
    #[error("you should write a macro name and value after the /D argument")]
    MissingDefine,
    #[error("invalid macro definition `{0}`, expected /D<name>[=value]")]
    InvalidDefine(String),
    #[error("you should write a shader profile after the /T argument")]
    MissingShaderProfile,
    #[error("{0} argument is not supported")]
    UnrecognizedArgument(String),
    #[error("you should write an entry name after the /E argument")]
    MissingEntryName,
    #[error("you should write an include path after the /I argument")]
    MissingIncludePath,
    #[error("invalid include path `{}`: {source}", .path.display())]
    InvalidIncludePath { path: PathBuf, source: io::Error },
    #[error("you should write the input hlsl file path as the last argument")]
    MissingInputPath,
    #[error("invalid input hlsl file path `{}`: {source}", .path.display())]
    InvalidInputPath { path: PathBuf, source: io::Error },
    #[error("you should write an output path after the /Fo argument")]
    MissingOutputPath,
    #[error("no output path was given, use /Fo <path>")]
    NoOutputPath,
    #[error("failed to create output file `{}`: {source}", .path.display())]
    InvalidOutputPath { path: PathBuf, source: io::Error },
    #[error("unknown compiler backend `{0}`")]
    UnknownBackend(String),
    #[error("the {backend} compiler is unavailable: {message}")]
    BackendUnavailable {
        backend: &'static str,
        message: String,
    },
    #[error("Compilation failed with HRESULT: {status:#010X}")]
    CompileFailed {
        status: HResult,
        diagnostics: Option<String>,
    },
}
impl FxcError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingDefine | Self::InvalidDefine(_) => ErrorCode::InvalidShaderDefine,
            Self::MissingShaderProfile => ErrorCode::InvalidShaderProfile,
            Self::UnrecognizedArgument(_) => ErrorCode::InvalidArgument,
            Self::MissingEntryName => ErrorCode::InvalidEntryName,
            Self::MissingIncludePath | Self::InvalidIncludePath { .. } => {
                ErrorCode::InvalidIncludePath
            }
            Self::MissingInputPath | Self::InvalidInputPath { .. } => ErrorCode::InvalidInputPath,
            Self::MissingOutputPath | Self::NoOutputPath | Self::InvalidOutputPath { .. } => {
                ErrorCode::InvalidOutputPath
            }
            Self::UnknownBackend(_) | Self::BackendUnavailable { .. } | Self::CompileFailed { .. } => {
                ErrorCode::ShaderCompileFailed
            }
        }
    }
    pub(crate) fn compile_failed<B: backend::Backend>(e: B::Error) -> Self {
        use backend::Error;
        log::debug!("{} backend error: {e}", B::NAME);
        Self::CompileFailed {
            status: e.status(),
            diagnostics: e.diagnostics().map(str::to_owned),
        }
    }
    /// Tells the user what went wrong on stderr, whatever the log filter is.
    pub fn report(&self) {
        log::debug!("{self:?}");
        let _ = self.report_to(&mut io::stderr().lock());
    }
    /// Compiler diagnostics are written verbatim, everything else as a one line message
    pub fn report_to(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::CompileFailed {
                diagnostics: Some(diagnostics),
                ..
            } => writeln!(out, "Compilation failed with errors: \n\t{diagnostics}"),
            _ => writeln!(out, "{self}"),
        }
    }
}
