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
// tinyfxc /T ps_5_0 /E fragment /Fo ./output.dxbc /Od /I ./include ./shader.hlsl
use std::{ffi::OsString, process::ExitCode};

use scopeguard::defer;
use tinyfxc::{BackendKind, config::LOG_ENV};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "info")).init();
    defer! {
        log::info!("Thank you!");
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    log::info!("Hello! this is tiny fxc.");
    log::info!("your arguments are:");
    for arg in &args {
        log::info!("\t{}", arg.to_string_lossy());
    }

    let result = tinyfxc::parse_args(&args)
        .and_then(|request| BackendKind::from_env()?.run(&request));
    tinyfxc::exit_code(result).into()
}
