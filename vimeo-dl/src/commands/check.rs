use crate::{
    error::{DependencyError, Result},
    utils::{self, FFMPEG, REQUIRED},
};
use clap::Args;
use colored::Colorize;
use log::info;

/// Check that yt-dlp, aria2c and ffmpeg are installed.
#[derive(Debug, Clone, Args)]
pub struct Check {}

impl Check {
    pub fn execute(self) -> Result<()> {
        let mut missing = Vec::new();

        for tool in REQUIRED.into_iter().chain([FFMPEG]) {
            let required = tool != FFMPEG;

            match utils::find_executable(tool) {
                Some(path) => info!("{:>8} {}", tool.green().bold(), path.to_string_lossy()),
                None if required => {
                    info!("{:>8} {}", tool.red().bold(), "missing (required)");
                    missing.push(tool);
                }
                None => info!("{:>8} {}", tool.yellow().bold(), "missing (needed for merging)"),
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DependencyError { missing }.into())
        }
    }
}
