mod check;
mod download;

pub use check::Check;
pub use download::Download;

use clap::{ColorChoice, Parser, Subcommand};

/// Download embedded vimeo player videos with yt-dlp and aria2c using browser cookies.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// When to output colored text.
    #[arg(long, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Show debug messages, including the exact yt-dlp command line.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    Check(Check),
    Download(Download),
}

impl Args {
    /// Runs the selected subcommand, `download` when none is given.
    pub fn execute(self) -> crate::error::Result<()> {
        match self.command {
            Some(Commands::Check(args)) => args.execute(),
            Some(Commands::Download(args)) => args.execute(),
            None => Download::default().execute(),
        }
    }
}
