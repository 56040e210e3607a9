use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    podboard_client_lib::run()
}
