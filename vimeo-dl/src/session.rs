use log::{debug, warn};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Working directories of a single run.
///
/// The temporary directory is removed when the session is dropped, whichever
/// way the run ends. The output directory is left in place.
pub struct Session {
    temp: TempDir,
    output: PathBuf,
}

impl Session {
    pub fn create(output: impl Into<PathBuf>) -> io::Result<Self> {
        let output = output.into();
        fs::create_dir_all(&output)?;

        let temp = tempfile::Builder::new().prefix("vimeo-dl-").tempdir()?;
        debug!("Created {}", temp.path().to_string_lossy());

        Ok(Self { temp, output })
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp.path()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Deleting {}", self.temp.path().to_string_lossy());
    }
}

/// `~/Downloads/vimeo-dl`, or `./vimeo-dl` when no home directory is known.
pub fn default_output_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("Downloads").join("vimeo-dl"),
        None => {
            warn!("Home directory couldn't be determined, using current directory.");
            PathBuf::from("vimeo-dl")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_created_and_temp_removed() {
        let root = TempDir::new().unwrap();
        let output = root.path().join("a").join("b");

        let session = Session::create(&output).unwrap();
        let temp = session.temp_dir().to_owned();

        assert!(output.is_dir());
        assert!(temp.is_dir());
        assert_ne!(temp, output);
        assert!(
            temp.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("vimeo-dl-")
        );

        drop(session);
        assert!(!temp.exists());
        assert!(output.is_dir());
    }

    #[test]
    fn default_output_ends_with_tool_name() {
        assert!(default_output_dir().ends_with("vimeo-dl"));
    }
}
