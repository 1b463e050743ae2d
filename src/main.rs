#[tokio::main]
async fn main() -> anyhow::Result<()> {
    account_recovery_api::cli::run_with_sys_args().await
}
