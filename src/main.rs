use std::process::ExitCode;

fn main() -> ExitCode {
    match smartflow_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("smartflow: {e}");
            ExitCode::FAILURE
        }
    }
}
