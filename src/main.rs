use std::process::ExitCode;

fn main() -> ExitCode {
    match gridfd3::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", gridfd3::error::ERROR_MARKER);
            ExitCode::from(err.exit_code())
        }
    }
}
