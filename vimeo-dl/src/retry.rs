use crate::{
    backend::{Backend, Invocation, Process},
    browser::Browser,
    classifier::classify,
    error::{DownloadError, Error, Result},
    interrupt,
    render::RenderState,
};
use colored::Colorize;
use log::{debug, info, warn};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Outcome of one backend run with one cookie source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptResult {
    pub source: Browser,
    pub succeeded: bool,
    pub exit_code: i32,
    pub last_error_text: Option<String>,
}

/// Failure reason carried from one attempt to the next.
///
/// An error line reported by yt-dlp is more useful than a bare exit code, so a
/// captured line is only ever replaced by another captured line.
enum LastError {
    None,
    Synthesized(String),
    Reported(String),
}

impl LastError {
    fn record(&mut self, attempt: &AttemptResult) {
        if let Some(text) = &attempt.last_error_text {
            *self = Self::Reported(text.clone());
        } else if !matches!(self, Self::Reported(_)) {
            *self = Self::Synthesized(format!(
                "yt-dlp exited with code {} using cookies from {}",
                attempt.exit_code, attempt.source
            ));
        }
    }

    fn spawn_failed(&mut self, source: Browser, e: &std::io::Error) {
        if !matches!(self, Self::Reported(_)) {
            *self = Self::Synthesized(format!(
                "could not launch yt-dlp using cookies from {source}: {e}"
            ));
        }
    }

    fn into_message(self) -> String {
        match self {
            Self::None => "no cookie sources to try".to_owned(),
            Self::Synthesized(x) | Self::Reported(x) => x,
        }
    }
}

/// Runs the backend once per cookie source until one attempt succeeds.
pub struct Controller<'a, B: Backend, W: Write> {
    backend: &'a B,
    out: W,
    temp_dir: PathBuf,
    output_dir: PathBuf,
    cancelled: fn() -> bool,
}

impl<'a, B: Backend, W: Write> Controller<'a, B, W> {
    pub fn new(backend: &'a B, out: W, temp_dir: &Path, output_dir: &Path) -> Self {
        Self {
            backend,
            out,
            temp_dir: temp_dir.to_owned(),
            output_dir: output_dir.to_owned(),
            cancelled: interrupt::is_interrupted,
        }
    }

    /// Replaces the Ctrl+C check, mostly useful for tests.
    pub fn cancelled_by(mut self, cancelled: fn() -> bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn attempt_all(
        &mut self,
        target: &str,
        referer: &str,
        sources: &[Browser],
    ) -> Result<AttemptResult> {
        let mut last_error = LastError::None;

        for (i, &source) in sources.iter().enumerate() {
            if (self.cancelled)() {
                return Err(Error::Cancelled);
            }

            info!(
                "{} [{}/{}] using cookies from {}",
                "Attempt".cyan(),
                i + 1,
                sources.len(),
                source.as_str().bold()
            );

            let invocation = Invocation {
                target: target.to_owned(),
                referer: referer.to_owned(),
                browser: source,
                temp_dir: self.temp_dir.clone(),
                output_dir: self.output_dir.clone(),
            };

            debug!("Executing yt-dlp {}", quoted(&invocation));

            // Only a failed launch moves on to the next source. Once a child
            // runs, any error here is fatal and the child is already reaped.
            let process = match self.backend.spawn(&invocation) {
                Ok(process) => process,
                Err(_) if (self.cancelled)() => return Err(Error::Cancelled),
                Err(e) => {
                    warn!("Couldn't run yt-dlp with cookies from {source}: {e}");
                    last_error.spawn_failed(source, &e);
                    continue;
                }
            };

            let attempt = match self.attempt(source, process) {
                Ok(attempt) => attempt,
                Err(_) if (self.cancelled)() => return Err(Error::Cancelled),
                Err(e) => return Err(e),
            };

            if (self.cancelled)() {
                return Err(Error::Cancelled);
            }

            if attempt.succeeded {
                return Ok(attempt);
            }

            warn!(
                "Download with cookies from {} failed (exit code {}).",
                source, attempt.exit_code
            );
            last_error.record(&attempt);
        }

        Err(DownloadError {
            message: last_error.into_message(),
        }
        .into())
    }

    fn attempt(
        &mut self,
        source: Browser,
        mut process: Box<dyn Process>,
    ) -> Result<AttemptResult> {
        let mut state = RenderState::default();

        if let Err(e) = self.relay(process.as_mut(), &mut state) {
            if let Err(e) = process.kill() {
                warn!("Couldn't stop yt-dlp: {e}");
            }

            return Err(e.into());
        }

        let exit_code = process.wait()?;

        Ok(AttemptResult {
            source,
            succeeded: exit_code == 0,
            exit_code,
            last_error_text: state.last_error_text,
        })
    }

    fn relay(&mut self, lines: &mut dyn Process, state: &mut RenderState) -> io::Result<()> {
        for line in lines {
            if (self.cancelled)() {
                break;
            }

            state.render(&classify(&line), &mut self.out)?;
        }

        state.finish(&mut self.out)
    }
}

fn quoted(invocation: &Invocation) -> String {
    invocation
        .args()
        .iter()
        .map(|x| {
            let x = x.to_string_lossy();
            if x.contains(' ') {
                format!("\"{x}\"")
            } else {
                x.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
