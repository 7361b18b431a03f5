use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match cfn_manage_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", cfn_manage_cli::format_error(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}
