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
//! A compiler that doesn't compile. It expands `#include` directives through the include
//! handler, checks that a profile was given and that the entry point is defined, and
//! writes out a small artifact describing what it was asked to do:
//!
//! ```text
//! magic "TFXD" | flags (u32, little endian) | profile '\n' | entry '\n' | name=value '\n'... | '\n' | expanded source
//! ```

use std::fmt::Write;

use thiserror::Error;
use types::IncludeType;

use crate::{Backend, BackendInstance, CompileDescriptor, E_FAIL, HResult, IncludeHandler};

pub const DUMMY_MAGIC: &[u8; 4] = b"TFXD";
pub const MAX_INCLUDE_DEPTH: usize = 32;

#[derive(Clone, Debug)]
pub struct Dummy;
impl Backend for Dummy {
    type Instance = DummyInstance;
    type Error = DummyError;

    const NAME: &'static str = "dummy";
}
impl Dummy {
    pub fn create_instance() -> Result<DummyInstance, DummyError> {
        Ok(DummyInstance)
    }
}

#[derive(Clone, Debug)]
pub struct DummyInstance;
impl BackendInstance<Dummy> for DummyInstance {
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    fn compile(
        &mut self,
        descriptor: &CompileDescriptor<'_>,
        includes: &mut dyn IncludeHandler,
    ) -> Result<Vec<u8>, DummyError> {
        let source_name = descriptor.source_name.unwrap_or("<memory>");
        let profile = descriptor
            .profile
            .ok_or_else(|| DummyError::Compile(format!("{source_name}: no shader profile given")))?;
        let entry = descriptor.entry_point.ok_or_else(|| {
            DummyError::Compile(format!("{source_name}: no entry point given"))
        })?;
        let source = std::str::from_utf8(descriptor.source).map_err(|_| DummyError::InvalidUtf8)?;

        let mut expanded = String::with_capacity(source.len());
        expand(source, includes, 0, &mut expanded)?;
        if !defines_function(&expanded, entry) {
            return Err(DummyError::Compile(format!(
                "{source_name}: entrypoint not found: '{entry}'"
            )));
        }

        let mut header = format!("{profile}\n{entry}\n");
        for shader_macro in descriptor.macros {
            writeln!(header, "{}={}", shader_macro.name, shader_macro.value).ok();
        }
        header.push('\n');

        let mut out = Vec::with_capacity(8 + header.len() + expanded.len());
        out.extend_from_slice(DUMMY_MAGIC);
        out.extend_from_slice(&descriptor.flags.bits().to_le_bytes());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(expanded.as_bytes());
        Ok(out)
    }
}

fn expand(
    source: &str,
    includes: &mut dyn IncludeHandler,
    depth: usize,
    out: &mut String,
) -> Result<(), DummyError> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(DummyError::Compile(
            "#include nested too deeply".to_owned(),
        ));
    }
    for line in source.lines() {
        let Some((include_type, name)) = parse_include(line) else {
            out.push_str(line);
            out.push('\n');
            continue;
        };
        let include = includes.open(include_type, name).ok_or_else(|| {
            DummyError::Compile(format!("failed to open source file: '{name}'"))
        })?;
        let result = match std::str::from_utf8(include.data()) {
            Ok(text) => expand(text, includes, depth + 1, out),
            Err(_) => Err(DummyError::InvalidUtf8),
        };
        includes.close(include);
        result?;
    }
    Ok(())
}

/// Parses `#include "name"` and `#include <name>`
fn parse_include(line: &str) -> Option<(IncludeType, &str)> {
    let rest = line.trim_start().strip_prefix('#')?;
    let rest = rest.trim_start().strip_prefix("include")?.trim();
    if let Some(rest) = rest.strip_prefix('"') {
        let (name, _) = rest.split_once('"')?;
        Some((IncludeType::Local, name))
    } else if let Some(rest) = rest.strip_prefix('<') {
        let (name, _) = rest.split_once('>')?;
        Some((IncludeType::System, name))
    } else {
        None
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `name` appears as an identifier directly followed by an opening parenthesis
fn defines_function(source: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    source.match_indices(name).any(|(idx, _)| {
        let before = source[..idx].chars().next_back();
        let after = &source[idx + name.len()..];
        !before.is_some_and(is_ident_char) && after.trim_start().starts_with('(')
    })
}

#[derive(Error, Debug)]
pub enum DummyError {
    #[error("{0}")]
    Compile(String),
    #[error("Source is not valid utf-8")]
    InvalidUtf8,
}
impl crate::Error<Dummy> for DummyError {
    fn status(&self) -> HResult {
        E_FAIL
    }
    fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Compile(diagnostics) => Some(diagnostics),
            Self::InvalidUtf8 => None,
        }
    }
}
