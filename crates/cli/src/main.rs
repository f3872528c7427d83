//! # dirbatch
//!
//! Runs a `useractions` JSON document against the directory service and
//! writes a CSV audit with one row per action.
//!
//! Connection and license settings come from the environment
//! (`DIRECTORY_*`, `LICENSE_*`), optionally loaded from a dotenv file.

use clap::Parser;

use commands::Opts;
mod commands;
mod logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opts: Opts = Opts::parse();
    logging::init(&opts.log_file)?;
    if let Err(err) = opts.run().await {
        tracing::error!("CRITICAL: {err:#}");
        return Err(err);
    }
    Ok(())
}
