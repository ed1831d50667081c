use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match contact::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server failed: {e}");

            ExitCode::FAILURE
        }
    }
}
