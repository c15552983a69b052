use std::process::ExitCode;

use slicevol::Options;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match slicevol::run(Options::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("slicevol failed: {e}");
            ExitCode::FAILURE
        }
    }
}
