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
//! Drives a single compilation: read the input, compile it, write the output.
//! A failure at any step ends the run; a failed compile never touches the output path.

use std::{ffi::OsStr, path::Path};

use backend::{Backend, BackendInstance, CompileDescriptor};
use types::CompilationRequest;

use crate::{ErrorCode, FxcError, IncludeResolver, args::parse_args};

pub fn read_source(path: &Path) -> Result<Vec<u8>, FxcError> {
    std::fs::read(path).map_err(|source| FxcError::InvalidInputPath {
        path: path.to_owned(),
        source,
    })
}

/// Compiles `source` with the request's settings, resolving includes with `resolver`
#[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
pub fn compile_source<B: Backend>(
    instance: &mut B::Instance,
    request: &CompilationRequest,
    source: &[u8],
    resolver: &mut IncludeResolver<'_>,
) -> Result<Vec<u8>, FxcError> {
    let source_name = request.input_path.to_string_lossy();
    let descriptor = CompileDescriptor {
        source,
        source_name: Some(&source_name),
        macros: &request.macros,
        entry_point: request.entry_point.as_deref(),
        profile: request.shader_profile.as_deref(),
        flags: request.flags,
        extra_flags: 0,
    };
    instance
        .compile(&descriptor, resolver)
        .map_err(FxcError::compile_failed::<B>)
}

pub fn write_output(path: Option<&Path>, binary: &[u8]) -> Result<(), FxcError> {
    let path = path.ok_or(FxcError::NoOutputPath)?;
    std::fs::write(path, binary).map_err(|source| FxcError::InvalidOutputPath {
        path: path.to_owned(),
        source,
    })
}

/// Runs a parsed request to completion. The backend is only created once the input has
/// been read.
#[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
pub fn run<B: Backend>(
    request: &CompilationRequest,
    create_instance: impl FnOnce() -> Result<B::Instance, B::Error>,
) -> Result<(), FxcError> {
    let source = read_source(&request.input_path)?;
    let mut resolver = IncludeResolver::new(&request.include_paths);
    let mut instance = create_instance().map_err(|e| FxcError::BackendUnavailable {
        backend: B::NAME,
        message: e.to_string(),
    })?;
    let binary = compile_source::<B>(&mut instance, request, &source, &mut resolver)?;
    drop(resolver);
    write_output(request.output_path.as_deref(), &binary)?;
    log::info!("compilation success.");
    Ok(())
}

/// Parses `args` and runs the result
pub fn compile_from_args<B: Backend, S: AsRef<OsStr>>(
    args: &[S],
    create_instance: impl FnOnce() -> Result<B::Instance, B::Error>,
) -> Result<(), FxcError> {
    let request = parse_args(args)?;
    run::<B>(&request, create_instance)
}

/// Reports a failed run to the user and picks the process exit status
pub fn exit_code(result: Result<(), FxcError>) -> ErrorCode {
    match result {
        Ok(()) => ErrorCode::None,
        Err(e) => {
            e.report();
            e.code()
        }
    }
}
