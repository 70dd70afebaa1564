//! Download embedded vimeo player videos by driving yt-dlp (with aria2c as
//! the external downloader) once per browser cookie store until one works.
//!
//! The interesting parts are [`classifier`], which sorts yt-dlp output lines,
//! [`render`], which turns them into a single in-place progress line, and
//! [`retry`], which walks the candidate browsers.

pub mod backend;
pub mod browser;
pub mod classifier;
mod commands;
pub mod error;
pub mod interrupt;
pub mod logger;
pub mod prompt;
pub mod render;
pub mod retry;
pub mod session;
pub mod utils;

#[doc(hidden)]
pub use commands::Args;
