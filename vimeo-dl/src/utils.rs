use crate::error::DependencyError;
use log::warn;
use std::{env, ffi::OsStr, path::PathBuf};

pub const YT_DLP: &str = "yt-dlp";
pub const ARIA2C: &str = "aria2c";
pub const FFMPEG: &str = "ffmpeg";

/// Tools the download cannot run without.
pub const REQUIRED: [&str; 2] = [YT_DLP, ARIA2C];

pub fn find_executable(name: &str) -> Option<PathBuf> {
    find_executable_in(name, env::var_os("PATH")?.as_os_str())
}

pub(crate) fn find_executable_in(name: &str, path: &OsStr) -> Option<PathBuf> {
    let bin = if cfg!(target_os = "windows") {
        format!("{name}.exe")
    } else {
        name.to_owned()
    };

    env::split_paths(path).find_map(|dir| {
        let x = dir.join(&bin);
        x.is_file().then_some(x)
    })
}

/// Locates `yt-dlp`, failing if it or the accelerator is missing.
///
/// A missing `ffmpeg` only warns since yt-dlp can still fetch pre-merged
/// formats without it.
pub fn check_dependencies() -> Result<PathBuf, DependencyError> {
    let mut missing = Vec::new();
    let mut yt_dlp = None;

    for tool in REQUIRED {
        match find_executable(tool) {
            Some(path) if tool == YT_DLP => yt_dlp = Some(path),
            Some(_) => (),
            None => missing.push(tool),
        }
    }

    if find_executable(FFMPEG).is_none() {
        warn!("ffmpeg couldn't be found, separate video and audio streams can't be merged.");
    }

    match yt_dlp {
        Some(path) if missing.is_empty() => Ok(path),
        _ => Err(DependencyError { missing }),
    }
}
