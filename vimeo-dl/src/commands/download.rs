use crate::{
    backend::YtDlp,
    browser::{self, Browser},
    error::Result,
    interrupt,
    prompt::{self, Prompter},
    retry::Controller,
    session::{self, Session},
    utils,
};
use clap::Args;
use colored::Colorize;
use log::info;
use std::{io, path::PathBuf};

/// Download a video from an embedded vimeo player (default).
#[derive(Debug, Clone, Default, Args)]
pub struct Download {
    /// Vimeo player url e.g. https://player.vimeo.com/video/76979871.
    /// Prompted for when not given.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Url of the page where the video is embedded, sent as referer.
    /// Prompted for when not given.
    #[arg(long, value_name = "URL")]
    pub referer: Option<String>,

    /// Browsers to read cookies from, tried in the given order.
    /// By default chrome, firefox, safari, edge, brave and chromium are tried.
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub browser: Vec<Browser>,

    /// Directory where the finished video is saved.
    /// By default ~/Downloads/vimeo-dl is used.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Raw style input prompts for old and unsupported terminals.
    #[arg(long)]
    pub raw_prompts: bool,
}

impl Download {
    pub fn execute(self) -> Result<()> {
        println!("Vimeo Embed Downloader (aria2c accelerated)\n");
        interrupt::init().map_err(io::Error::other)?;

        let yt_dlp = YtDlp::new(utils::check_dependencies()?);
        let prompter = Prompter {
            raw: self.raw_prompts,
        };

        let url = match self.url {
            Some(url) => prompt::validate_player_url(&url)?,
            None => prompter.player_url()?,
        };
        let referer = match self.referer {
            Some(referer) => prompt::validate_referer_url(&referer)?,
            None => prompter.referer_url()?,
        };
        let browsers = if self.browser.is_empty() {
            Browser::ALL.to_vec()
        } else {
            browser::dedup(self.browser)
        };
        let output = self.output.unwrap_or_else(session::default_output_dir);

        interrupt::defer_exit();
        let session = Session::create(&output)?;

        info!("\n=== Download Settings ===");
        info!("{} : {}", "Vimeo URL    ".bold(), url);
        info!("{} : {}", "Embed Referer".bold(), referer);
        info!(
            "{} : {}",
            "Browsers     ".bold(),
            browsers.iter().map(Browser::as_str).collect::<Vec<_>>().join(", ")
        );
        info!("{} : {}", "Output       ".bold(), output.to_string_lossy());
        info!("{} : {}", "yt-dlp       ".bold(), yt_dlp.program().to_string_lossy());
        info!("=========================\n");

        let attempt = Controller::new(
            &yt_dlp,
            io::stdout(),
            session.temp_dir(),
            session.output_dir(),
        )
        .attempt_all(&url, &referer, &browsers)?;

        info!(
            "{} download + merge completed using cookies from {}, saved in {}",
            "Done".green().bold(),
            attempt.source,
            session.output_dir().to_string_lossy()
        );

        Ok(())
    }
}
