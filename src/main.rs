use anyhow::Result;
use tracing::{error, info};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = cli::parse_args();

    // Initialize logging
    page_loader::utils::init_logging(args.verbose, args.log_destination())?;

    info!("Starting page-loader v{}", env!("CARGO_PKG_VERSION"));

    // Process commands
    match cli::process_command(args).await {
        Ok(_) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
