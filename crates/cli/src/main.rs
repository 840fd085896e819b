use std::process::ExitCode;

fn main() -> ExitCode {
    grocery_cli::run()
}
