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
    ffi::{CStr, CString, NulError, OsStr, c_char, c_void},
    ptr::{self, NonNull},
};

use libloading::Library;
use thiserror::Error;
use types::{IncludeType, OpenedInclude};

use crate::{
    Backend, BackendInstance, CompileDescriptor, E_FAIL, E_INVALIDARG, HResult, IncludeHandler,
    S_OK,
};

pub const DEFAULT_LIBRARY: &str = "d3dcompiler_47.dll";

type D3DCompileFn = unsafe extern "system" fn(
    src_data: *const c_void,
    src_data_size: usize,
    source_name: *const c_char,
    defines: *const RawShaderMacro,
    include: *mut c_void,
    entrypoint: *const c_char,
    target: *const c_char,
    flags1: u32,
    flags2: u32,
    code: *mut *mut RawBlob,
    error_msgs: *mut *mut RawBlob,
) -> HResult;

/// `D3D_SHADER_MACRO`
#[repr(C)]
struct RawShaderMacro {
    name: *const c_char,
    definition: *const c_char,
}

/// `ID3DBlob`
#[repr(C)]
struct RawBlob {
    vtbl: *const BlobVtbl,
}
#[repr(C)]
struct BlobVtbl {
    _query_interface:
        unsafe extern "system" fn(*mut RawBlob, *const c_void, *mut *mut c_void) -> HResult,
    _add_ref: unsafe extern "system" fn(*mut RawBlob) -> u32,
    release: unsafe extern "system" fn(*mut RawBlob) -> u32,
    get_buffer_pointer: unsafe extern "system" fn(*mut RawBlob) -> *mut c_void,
    get_buffer_size: unsafe extern "system" fn(*mut RawBlob) -> usize,
}

/// Owned reference to a blob returned by the compiler, released on drop
struct Blob(NonNull<RawBlob>);
impl Blob {
    /// # Safety
    /// * `raw` must be null or a blob the caller owns a reference to
    unsafe fn from_raw(raw: *mut RawBlob) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }
    fn as_bytes(&self) -> &[u8] {
        unsafe {
            let raw = self.0.as_ptr();
            let vtbl = &*(*raw).vtbl;
            let data = (vtbl.get_buffer_pointer)(raw);
            let len = (vtbl.get_buffer_size)(raw);
            if data.is_null() || len == 0 {
                &[]
            } else {
                std::slice::from_raw_parts(data.cast::<u8>(), len)
            }
        }
    }
    /// Message blobs are nul terminated
    fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes())
            .trim_end_matches('\0')
            .to_owned()
    }
}
impl Drop for Blob {
    fn drop(&mut self) {
        unsafe {
            let raw = self.0.as_ptr();
            ((*(*raw).vtbl).release)(raw);
        }
    }
}

/// `ID3DInclude`. Not a COM interface, just a table of two functions.
#[repr(C)]
struct IncludeVtbl {
    open: unsafe extern "system" fn(
        this: *mut c_void,
        include_type: u32,
        file_name: *const c_char,
        parent_data: *const c_void,
        data: *mut *const c_void,
        bytes: *mut u32,
    ) -> HResult,
    close: unsafe extern "system" fn(this: *mut c_void, data: *const c_void) -> HResult,
}
static INCLUDE_VTBL: IncludeVtbl = IncludeVtbl {
    open: include_open,
    close: include_close,
};

/// Lends includes from an [`IncludeHandler`] to the native compiler. Includes the
/// compiler never closes are given back to the handler when the shim is dropped.
#[repr(C)]
struct IncludeShim<'a> {
    vtbl: *const IncludeVtbl,
    handler: &'a mut dyn IncludeHandler,
    lent: Vec<OpenedInclude>,
}
impl<'a> IncludeShim<'a> {
    fn new(handler: &'a mut dyn IncludeHandler) -> Self {
        Self {
            vtbl: &INCLUDE_VTBL,
            handler,
            lent: Vec::new(),
        }
    }
}
unsafe extern "system" fn include_open(
    this: *mut c_void,
    include_type: u32,
    file_name: *const c_char,
    _parent_data: *const c_void,
    data: *mut *const c_void,
    bytes: *mut u32,
) -> HResult {
    unsafe {
        if this.is_null() || file_name.is_null() || data.is_null() || bytes.is_null() {
            return E_INVALIDARG;
        }
        let shim = &mut *this.cast::<IncludeShim<'_>>();
        let name = CStr::from_ptr(file_name).to_string_lossy();
        let include_type = IncludeType::from_raw(include_type).unwrap_or_default();
        let Some(include) = shim.handler.open(include_type, &name) else {
            return E_FAIL;
        };
        let Ok(len) = u32::try_from(include.len()) else {
            log::error!("Include file {name} is too large");
            shim.handler.close(include);
            return E_FAIL;
        };
        *data = include.as_ptr().cast();
        *bytes = len;
        shim.lent.push(include);
        S_OK
    }
}
unsafe extern "system" fn include_close(this: *mut c_void, data: *const c_void) -> HResult {
    unsafe {
        if this.is_null() {
            return E_INVALIDARG;
        }
        let shim = &mut *this.cast::<IncludeShim<'_>>();
        let Some(idx) = shim
            .lent
            .iter()
            .position(|include| include.as_ptr().cast::<c_void>() == data)
        else {
            return E_FAIL;
        };
        let include = shim.lent.swap_remove(idx);
        shim.handler.close(include);
        S_OK
    }
}

impl Drop for IncludeShim<'_> {
    fn drop(&mut self) {
        for include in self.lent.drain(..) {
            log::warn!("Compiler did not close an include, releasing it");
            self.handler.close(include);
        }
    }
}

fn opt_ptr(s: &Option<CString>) -> *const c_char {
    s.as_ref().map_or(ptr::null(), |s| s.as_ptr())
}

/// The native `D3DCompile` entry point, loaded at runtime.
#[derive(Clone, Debug)]
pub struct D3dCompiler;
impl Backend for D3dCompiler {
    type Instance = D3dInstance;
    type Error = D3dError;

    const NAME: &'static str = "d3d";
}
impl D3dCompiler {
    pub fn create_instance(library: impl AsRef<OsStr>) -> Result<D3dInstance, D3dError> {
        unsafe {
            let library = Library::new(library.as_ref())?;
            let compile = *library.get::<D3DCompileFn>(b"D3DCompile\0")?;
            Ok(D3dInstance {
                compile,
                _library: library,
            })
        }
    }
}

#[derive(Debug)]
pub struct D3dInstance {
    compile: D3DCompileFn,
    // Must outlive `compile`
    _library: Library,
}
impl BackendInstance<D3dCompiler> for D3dInstance {
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    fn compile(
        &mut self,
        descriptor: &CompileDescriptor<'_>,
        includes: &mut dyn IncludeHandler,
    ) -> Result<Vec<u8>, D3dError> {
        let macro_strings = descriptor
            .macros
            .iter()
            .map(|m| -> Result<_, NulError> {
                Ok((CString::new(m.name.as_str())?, CString::new(m.value.as_str())?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut macros: Vec<RawShaderMacro> = macro_strings
            .iter()
            .map(|(name, definition)| RawShaderMacro {
                name: name.as_ptr(),
                definition: definition.as_ptr(),
            })
            .collect();
        macros.push(RawShaderMacro {
            name: ptr::null(),
            definition: ptr::null(),
        });
        let source_name = descriptor.source_name.map(CString::new).transpose()?;
        let entry_point = descriptor.entry_point.map(CString::new).transpose()?;
        let profile = descriptor.profile.map(CString::new).transpose()?;

        let mut shim = IncludeShim::new(includes);
        let mut raw_code = ptr::null_mut();
        let mut raw_errors = ptr::null_mut();
        let (hr, code, errors) = unsafe {
            let hr = (self.compile)(
                descriptor.source.as_ptr().cast(),
                descriptor.source.len(),
                opt_ptr(&source_name),
                macros.as_ptr(),
                (&raw mut shim).cast(),
                opt_ptr(&entry_point),
                opt_ptr(&profile),
                descriptor.flags.bits(),
                descriptor.extra_flags,
                &mut raw_code,
                &mut raw_errors,
            );
            (hr, Blob::from_raw(raw_code), Blob::from_raw(raw_errors))
        };
        drop(shim);

        if hr < 0 {
            return Err(D3dError::Compile {
                hresult: hr,
                diagnostics: errors.map(|blob| blob.to_string_lossy()),
            });
        }
        if let Some(warnings) = errors {
            log::warn!("{}", warnings.to_string_lossy());
        }
        let code = code.ok_or(D3dError::NoBytecode)?;
        Ok(code.as_bytes().to_vec())
    }
}

#[derive(Error, Debug)]
pub enum D3dError {
    #[error("Failed to load the shader compiler: {0}")]
    Load(#[from] libloading::Error),
    #[error("Compiler arguments can't contain nul bytes: {0}")]
    InteriorNul(#[from] NulError),
    #[error("Compilation failed with HRESULT: {hresult:#010X}")]
    Compile {
        hresult: HResult,
        diagnostics: Option<String>,
    },
    #[error("The compiler reported success but returned no bytecode")]
    NoBytecode,
}
impl crate::Error<D3dCompiler> for D3dError {
    fn status(&self) -> HResult {
        match self {
            Self::Compile { hresult, .. } => *hresult,
            Self::InteriorNul(_) => E_INVALIDARG,
            Self::Load(_) | Self::NoBytecode => E_FAIL,
        }
    }
    fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::Compile { diagnostics, .. } => diagnostics.as_deref(),
            _ => None,
        }
    }
}
