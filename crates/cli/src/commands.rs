use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use dirbatch::directory::Directory;
use dirbatch::provisioning::{BatchRunner, Dispatcher, LicenseConfig};

#[derive(Parser)]
#[clap(version, about = "Create, update and delete directory users from a JSON batch")]
pub struct Opts {
    /// Input JSON file with user actions and params
    #[clap(short = 'f', long = "file")]
    pub file: PathBuf,
    /// Output CSV file with the result of every user action
    #[clap(short = 'o', long = "out")]
    pub out: PathBuf,
    /// Dotenv file with DIRECTORY_* and LICENSE_* settings
    #[clap(long)]
    pub env_file: Option<PathBuf>,
    /// Persistent log file
    #[clap(long, default_value = "dirbatch.log")]
    pub log_file: PathBuf,
}

impl Opts {
    pub async fn run(self) -> anyhow::Result<()> {
        if let Some(env_file) = &self.env_file {
            dotenv::from_path(env_file)
                .with_context(|| format!("unable to read settings from {}", env_file.display()))?;
        }
        let directory = Directory::new().context("unable to parse the directory settings")?;
        let licenses = LicenseConfig::new().context("unable to parse the license settings")?;
        tracing::debug!("directory settings: {:?}", directory.config());

        let runner = BatchRunner::new(Dispatcher::new(directory, licenses));
        let summary = runner.run_files(&self.file, &self.out).await?;
        tracing::info!(
            "processed {} user actions: {} succeeded, {} failed",
            summary.total,
            summary.succeeded,
            summary.failed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Opts;
    use clap::Parser;

    #[test]
    fn parse_short_flags() {
        let opts = Opts::parse_from(["dirbatch", "-f", "input.json", "-o", "output.csv"]);
        assert_eq!(opts.file.to_str(), Some("input.json"));
        assert_eq!(opts.out.to_str(), Some("output.csv"));
        assert!(opts.env_file.is_none());
        assert_eq!(opts.log_file.to_str(), Some("dirbatch.log"));
    }

    #[test]
    fn input_and_output_are_required() {
        assert!(Opts::try_parse_from(["dirbatch", "-f", "input.json"]).is_err());
    }
}
