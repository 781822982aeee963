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
pub use log;
pub use paste;
use tracing_subscriber::fmt::format::FmtSpan;

/// Prints every instrumented span as it opens and closes, with its fields and timing.
/// The crate under test only emits spans when built with its `trace` feature.
/// `log` records keep going to env_logger.
pub fn setup_trace_printer() {
    let subscriber = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
/// Routes `log` output through the test harness so it only shows for failing tests
pub fn setup_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
pub fn should_skip_backend(backend_name: &str) -> bool {
    std::env::var(format!("TINYFXC_SKIP_BACKEND_{backend_name}"))
        .is_ok_and(|a| &a != "0" && &a != "false" && !a.is_empty())
}
#[macro_export]
macro_rules! all_backend_tests_inner {
    ($func_name:ident, $backend_name:literal, $instance_create:block, $test_name:ident, $backend:path) => {
        #[test]
        pub fn $func_name() {
            if $crate::should_skip_backend($backend_name) {
                return;
            }
            $crate::setup_test_logger();
            #[cfg(feature = "trace")]
            $crate::setup_trace_printer();
            $crate::log::info!("{} test", $backend_name);
            let instance = $instance_create;
            let instance = instance
                .unwrap_or_else(|e| panic!("Failed to create {} instance: {e}", $backend_name));
            $crate::log::info!("Created {} instance", $backend_name);
            $test_name::<$backend>(instance);
        }
    };
}
/// Instantiates `$test_name::<B>(instance)` once per available backend. The calling crate
/// must depend on `backend` and have `d3d` and `trace` features.
#[macro_export]
macro_rules! all_backend_tests {
    ($test_name:ident) => {
        $crate::paste::paste! {
            $crate::all_backend_tests_inner!([<$test_name _dummy>], "DUMMY", {
                backend::Dummy::create_instance()
            }, $test_name, backend::Dummy);

            #[cfg(all(feature = "d3d", target_os = "windows"))]
            $crate::all_backend_tests_inner!([<$test_name _d3d>], "D3D", {
                backend::D3dCompiler::create_instance(backend::d3d::DEFAULT_LIBRARY)
            }, $test_name, backend::D3dCompiler);
        }
    };
}
