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
//! fxc style argument parsing.
//!
//! ```text
//! tinyfxc [flags...] <input>
//! ```
//!
//! The last argument is always the input file. Flags that take a value accept it either
//! attached (`/Tps_5_0`) or as the next argument (`/T ps_5_0`). Paths are kept as the
//! raw OS strings they were given as; only flag names have to be ASCII.

use std::{
    ffi::{OsStr, OsString},
    io,
    path::{MAIN_SEPARATOR_STR, PathBuf},
};

use types::{CompilationRequest, CompileFlags, ShaderMacro};

use crate::FxcError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ValueFlag {
    Define,
    Profile,
    Entry,
    Include,
    Output,
}
impl ValueFlag {
    fn missing(self) -> FxcError {
        match self {
            Self::Define => FxcError::MissingDefine,
            Self::Profile => FxcError::MissingShaderProfile,
            Self::Entry => FxcError::MissingEntryName,
            Self::Include => FxcError::MissingIncludePath,
            Self::Output => FxcError::MissingOutputPath,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlagKind {
    Switch(CompileFlags),
    Value(ValueFlag),
}

const FLAGS: &[(&str, FlagKind)] = &[
    ("/ZI", FlagKind::Switch(CompileFlags::DEBUG)),
    ("/Vd", FlagKind::Switch(CompileFlags::SKIP_VALIDATION)),
    ("/Od", FlagKind::Switch(CompileFlags::SKIP_OPTIMIZATION)),
    ("/Zpr", FlagKind::Switch(CompileFlags::PACK_MATRIX_ROW_MAJOR)),
    ("/Zpc", FlagKind::Switch(CompileFlags::PACK_MATRIX_COLUMN_MAJOR)),
    ("/Gpp", FlagKind::Switch(CompileFlags::PARTIAL_PRECISION)),
    ("/Op", FlagKind::Switch(CompileFlags::NO_PRESHADER)),
    ("/Gfa", FlagKind::Switch(CompileFlags::AVOID_FLOW_CONTROL)),
    ("/Ges", FlagKind::Switch(CompileFlags::ENABLE_STRICTNESS)),
    ("/Gis", FlagKind::Switch(CompileFlags::IEEE_STRICTNESS)),
    ("/Gec", FlagKind::Switch(CompileFlags::ENABLE_BACKWARDS_COMPATIBILITY)),
    ("/O0", FlagKind::Switch(CompileFlags::OPTIMIZATION_LEVEL0)),
    ("/O1", FlagKind::Switch(CompileFlags::OPTIMIZATION_LEVEL1)),
    ("/O2", FlagKind::Switch(CompileFlags::OPTIMIZATION_LEVEL2)),
    ("/O3", FlagKind::Switch(CompileFlags::OPTIMIZATION_LEVEL3)),
    ("/WX", FlagKind::Switch(CompileFlags::WARNINGS_ARE_ERRORS)),
    ("/Zss", FlagKind::Switch(CompileFlags::DEBUG_NAME_FOR_SOURCE)),
    ("/Zsb", FlagKind::Switch(CompileFlags::DEBUG_NAME_FOR_BINARY)),
    ("/res_may_alias", FlagKind::Switch(CompileFlags::RESOURCES_MAY_ALIAS)),
    (
        "/enable_unbounded_descriptor_tables",
        FlagKind::Switch(CompileFlags::ENABLE_UNBOUNDED_DESCRIPTOR_TABLES),
    ),
    ("/all_resources_bound", FlagKind::Switch(CompileFlags::ALL_RESOURCES_BOUND)),
    ("/D", FlagKind::Value(ValueFlag::Define)),
    ("/T", FlagKind::Value(ValueFlag::Profile)),
    ("/E", FlagKind::Value(ValueFlag::Entry)),
    ("/I", FlagKind::Value(ValueFlag::Include)),
    ("/Fo", FlagKind::Value(ValueFlag::Output)),
];

/// Finds the flag `arg` starts with. For value flags, also returns the attached value
/// when the argument is longer than the flag name.
fn lookup(arg: &OsStr) -> Option<(FlagKind, Option<&OsStr>)> {
    let bytes = arg.as_encoded_bytes();
    FLAGS.iter().find_map(|(name, kind)| match kind {
        FlagKind::Switch(_) => (bytes == name.as_bytes()).then_some((*kind, None)),
        FlagKind::Value(_) => {
            let rest = bytes.strip_prefix(name.as_bytes())?;
            // SAFETY: flag names are ASCII and `rest` directly follows one
            let rest = unsafe { OsStr::from_encoded_bytes_unchecked(rest) };
            Some((*kind, (!rest.is_empty()).then_some(rest)))
        }
    })
}

/// Splits on the first `=`. A bare name is defined as `1`.
pub fn parse_define(definition: &str) -> Result<ShaderMacro, FxcError> {
    let (name, value) = definition.split_once('=').unwrap_or((definition, "1"));
    if name.is_empty() {
        return Err(FxcError::InvalidDefine(definition.to_owned()));
    }
    Ok(ShaderMacro::new(name, value))
}

/// Paths starting with `.` are made absolute against the current directory
fn absolutize(path: &OsStr) -> io::Result<PathBuf> {
    if path.as_encoded_bytes().starts_with(b".") {
        std::path::absolute(path)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Makes the directory absolute if it is relative and ends it with a path separator, so
/// that include names can be appended directly.
pub fn normalize_include_path(dir: &OsStr) -> Result<PathBuf, FxcError> {
    if dir.is_empty() {
        return Err(FxcError::MissingIncludePath);
    }
    let mut normalized: OsString = absolutize(dir)
        .map_err(|source| FxcError::InvalidIncludePath {
            path: PathBuf::from(dir),
            source,
        })?
        .into();
    let ends_with_separator = normalized
        .as_encoded_bytes()
        .last()
        .is_some_and(|&b| std::path::is_separator(char::from(b)));
    if !ends_with_separator {
        normalized.push(MAIN_SEPARATOR_STR);
    }
    Ok(normalized.into())
}

/// Parses a full argument vector. The first element is the program name.
#[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
pub fn parse_args<S: AsRef<OsStr>>(args: &[S]) -> Result<CompilationRequest, FxcError> {
    let Some((input, flags)) = args.get(1..).and_then(<[S]>::split_last) else {
        return Err(FxcError::MissingInputPath);
    };
    let mut request = CompilationRequest::default();

    let mut tokens = flags.iter().map(AsRef::<OsStr>::as_ref);
    while let Some(arg) = tokens.next() {
        let Some((kind, attached)) = lookup(arg) else {
            return Err(FxcError::UnrecognizedArgument(
                arg.to_string_lossy().into_owned(),
            ));
        };
        let flag = match kind {
            FlagKind::Switch(bits) => {
                request.flags |= bits;
                continue;
            }
            FlagKind::Value(flag) => flag,
        };
        let value = match attached {
            Some(value) => value,
            None => tokens.next().ok_or_else(|| flag.missing())?,
        };
        match flag {
            ValueFlag::Define => request.macros.push(parse_define(&value.to_string_lossy())?),
            ValueFlag::Profile => request.shader_profile = Some(value.to_string_lossy().into()),
            ValueFlag::Entry => request.entry_point = Some(value.to_string_lossy().into()),
            ValueFlag::Include => request.include_paths.push(normalize_include_path(value)?),
            ValueFlag::Output => request.output_path = Some(PathBuf::from(value)),
        }
    }

    let input = input.as_ref();
    request.input_path = absolutize(input).map_err(|source| FxcError::InvalidInputPath {
        path: PathBuf::from(input),
        source,
    })?;
    log::debug!("Parsed request: {request:?}");
    Ok(request)
}
