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
use std::collections::HashMap;

use crate as backend;
use crate::{
    Backend, BackendInstance, CompileDescriptor, Error, IncludeHandler,
    dummy::{DUMMY_MAGIC, Dummy},
};
use types::{CompileFlags, IncludeType, OpenedInclude, ShaderMacro};

const PIXEL_SHADER: &str = r#"#include "common.hlsli"
float4 main(float4 pos : SV_POSITION) : SV_TARGET
{
    return tint(pos);
}
"#;
const COMMON: &str = "float4 tint(float4 c) { return c * 0.5; }\n";

#[derive(Default)]
struct MapIncludes {
    files: HashMap<String, Vec<u8>>,
    requests: Vec<(IncludeType, String)>,
    opened: usize,
    closed: usize,
}
impl MapIncludes {
    fn with(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_owned(), contents.as_bytes().to_vec());
        self
    }
}
impl IncludeHandler for MapIncludes {
    fn open(&mut self, include_type: IncludeType, name: &str) -> Option<OpenedInclude> {
        self.requests.push((include_type, name.to_owned()));
        let data = self.files.get(name)?.clone();
        self.opened += 1;
        Some(OpenedInclude::new(data))
    }
    fn close(&mut self, _include: OpenedInclude) {
        self.closed += 1;
    }
}

fn descriptor<'a>(source: &'a str, macros: &'a [ShaderMacro]) -> CompileDescriptor<'a> {
    CompileDescriptor {
        source: source.as_bytes(),
        source_name: Some("test.hlsl"),
        macros,
        entry_point: Some("main"),
        profile: Some("ps_5_0"),
        flags: CompileFlags::empty(),
        extra_flags: 0,
    }
}

fn compiles_with_includes<B: Backend>(mut instance: B::Instance) {
    let mut includes = MapIncludes::default().with("common.hlsli", COMMON);
    let out = instance
        .compile(&descriptor(PIXEL_SHADER, &[]), &mut includes)
        .unwrap();
    assert!(!out.is_empty());
    assert_eq!(includes.opened, 1);
    assert_eq!(includes.closed, includes.opened);
}
dev_utils::all_backend_tests!(compiles_with_includes);

fn missing_include_fails<B: Backend>(mut instance: B::Instance) {
    let mut includes = MapIncludes::default();
    let err = instance
        .compile(&descriptor(PIXEL_SHADER, &[]), &mut includes)
        .unwrap_err();
    assert!(err.status() < 0);
    assert_eq!(includes.closed, includes.opened);
}
dev_utils::all_backend_tests!(missing_include_fails);

#[test]
fn dummy_artifact_layout() {
    let mut instance = Dummy::create_instance().unwrap();
    let mut includes = MapIncludes::default().with("common.hlsli", COMMON);
    let macros = [ShaderMacro::new("A", "1"), ShaderMacro::new("B", "x=y")];
    let mut desc = descriptor(PIXEL_SHADER, &macros);
    desc.flags = CompileFlags::DEBUG | CompileFlags::OPTIMIZATION_LEVEL3;
    let out = instance.compile(&desc, &mut includes).unwrap();

    assert_eq!(&out[..4], DUMMY_MAGIC);
    let flags = u32::from_le_bytes(out[4..8].try_into().unwrap());
    assert_eq!(flags, desc.flags.bits());
    let text = std::str::from_utf8(&out[8..]).unwrap();
    assert!(text.starts_with("ps_5_0\nmain\nA=1\nB=x=y\n\n"));
    // The include was expanded in place
    assert!(text.contains(COMMON));
    assert!(!text.contains("#include"));
}

#[test]
fn dummy_nested_failure_closes_everything() {
    let mut instance = Dummy::create_instance().unwrap();
    let mut includes = MapIncludes::default()
        .with("common.hlsli", "#include <inner.hlsli>\n")
        .with("inner.hlsli", "#include \"missing.hlsli\"\n");
    let err = instance
        .compile(&descriptor(PIXEL_SHADER, &[]), &mut includes)
        .unwrap_err();

    assert_eq!(includes.opened, 2);
    assert_eq!(includes.closed, 2);
    assert_eq!(
        includes.requests,
        vec![
            (IncludeType::Local, "common.hlsli".to_owned()),
            (IncludeType::System, "inner.hlsli".to_owned()),
            (IncludeType::Local, "missing.hlsli".to_owned()),
        ]
    );
    assert!(err.diagnostics().unwrap().contains("missing.hlsli"));
}

#[test]
fn dummy_recursive_include_is_bounded() {
    let mut instance = Dummy::create_instance().unwrap();
    let mut includes = MapIncludes::default().with("common.hlsli", "#include \"common.hlsli\"\n");
    let err = instance
        .compile(&descriptor(PIXEL_SHADER, &[]), &mut includes)
        .unwrap_err();
    assert!(err.diagnostics().unwrap().contains("nested too deeply"));
    assert_eq!(includes.closed, includes.opened);
}

#[test]
fn dummy_requires_entry_point_definition() {
    let mut instance = Dummy::create_instance().unwrap();
    let source = "float4 mainly(float4 p) { return p; }\nfloat4 xmain (float4 p) { return p; }\n";
    let err = instance
        .compile(&descriptor(source, &[]), &mut MapIncludes::default())
        .unwrap_err();
    assert!(err.diagnostics().unwrap().contains("'main'"));

    let source = "float4 main (float4 p) { return p; }\n";
    assert!(
        instance
            .compile(&descriptor(source, &[]), &mut MapIncludes::default())
            .is_ok()
    );
}

#[test]
fn dummy_requires_profile_and_entry() {
    let mut instance = Dummy::create_instance().unwrap();
    let source = "float4 main(float4 p) { return p; }\n";

    let mut desc = descriptor(source, &[]);
    desc.profile = None;
    let err = instance
        .compile(&desc, &mut MapIncludes::default())
        .unwrap_err();
    assert!(err.diagnostics().unwrap().contains("profile"));

    let mut desc = descriptor(source, &[]);
    desc.entry_point = None;
    let err = instance
        .compile(&desc, &mut MapIncludes::default())
        .unwrap_err();
    assert!(err.diagnostics().unwrap().contains("entry point"));
}
