use crate::{browser::Browser, interrupt};
use std::{
    ffi::OsString,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc},
    thread,
    time::Duration,
};

pub const FORMAT: &str = "bestvideo+bestaudio/best";
pub const MERGE_OUTPUT_FORMAT: &str = "mp4";
pub const ACCELERATOR: &str = "aria2c";
/// 16 connections, 16 segments per file, 1 MiB minimum split size.
pub const ACCELERATOR_ARGS: &str = "aria2c:-x16 -s16 -k1M";

/// Everything needed to run yt-dlp once against a single cookie source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub target: String,
    pub referer: String,
    pub browser: Browser,
    pub temp_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Invocation {
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::<OsString>::new();

        for arg in [
            "--cookies-from-browser",
            self.browser.as_str(),
            "--referer",
            self.referer.as_str(),
            "-f",
            FORMAT,
            "--merge-output-format",
            MERGE_OUTPUT_FORMAT,
            "--downloader",
            ACCELERATOR,
            "--downloader-args",
            ACCELERATOR_ARGS,
            "--newline",
            "--progress",
        ] {
            args.push(arg.into());
        }

        args.push("-P".into());
        args.push(path_override("temp", &self.temp_dir));
        args.push("-P".into());
        args.push(path_override("home", &self.output_dir));
        args.push(self.target.as_str().into());
        args
    }
}

fn path_override(kind: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(kind);
    arg.push(":");
    arg.push(path);
    arg
}

/// Something that can start the download backend.
pub trait Backend {
    fn spawn(&self, invocation: &Invocation) -> std::io::Result<Box<dyn Process>>;
}

/// A running backend.
///
/// Iterating yields the merged stdout/stderr lines in the order they arrive and
/// ends once both streams are closed.
pub trait Process: Iterator<Item = String> {
    /// Waits for the process to exit and returns its exit code.
    fn wait(self: Box<Self>) -> std::io::Result<i32>;

    /// Terminates the process and reaps it without draining its output.
    fn kill(self: Box<Self>) -> std::io::Result<()>;
}

/// The real backend, an installed `yt-dlp`.
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Backend for YtDlp {
    fn spawn(&self, invocation: &Invocation) -> std::io::Result<Box<dyn Process>> {
        let mut child = Command::new(&self.program)
            .args(invocation.args())
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);

        if let Some(stdout) = child.stdout.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || forward_lines(stdout, tx)));
        }

        if let Some(stderr) = child.stderr.take() {
            let tx = tx.clone();
            readers.push(thread::spawn(move || forward_lines(stderr, tx)));
        }

        drop(tx);

        let child = Arc::new(Mutex::new(child));
        interrupt::track(child.clone());

        Ok(Box::new(ChildProcess {
            child,
            lines: rx.into_iter(),
            readers,
        }))
    }
}

fn forward_lines<R: Read>(stream: R, tx: mpsc::Sender<String>) {
    let reader = BufReader::new(stream);

    for line in reader.split(b'\n') {
        let Ok(line) = line else {
            break;
        };

        let line = String::from_utf8_lossy(&line)
            .trim_end_matches('\r')
            .to_owned();

        if tx.send(line).is_err() {
            break;
        }
    }
}

struct ChildProcess {
    child: Arc<Mutex<Child>>,
    lines: mpsc::IntoIter<String>,
    readers: Vec<thread::JoinHandle<()>>,
}

impl Iterator for ChildProcess {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}

impl Process for ChildProcess {
    fn wait(self: Box<Self>) -> std::io::Result<i32> {
        let ChildProcess {
            child,
            lines,
            readers,
        } = *self;
        drop(lines);

        for reader in readers {
            let _ = reader.join();
        }

        let status = poll_exit(&child);

        if status.is_err() {
            let _ = terminate(&child);
        }

        interrupt::untrack();
        Ok(status?.code().unwrap_or(-1))
    }

    fn kill(self: Box<Self>) -> std::io::Result<()> {
        let ChildProcess { child, lines, .. } = *self;
        // Reader threads exit on their own once the pipes close or a send
        // fails. Joining them could hang on a grandchild holding the pipe.
        drop(lines);

        let status = terminate(&child);
        interrupt::untrack();
        status.map(|_| ())
    }
}

fn lock(child: &Mutex<Child>) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(PoisonError::into_inner)
}

// Polled so the interrupt handler can still take the lock and kill.
fn poll_exit(child: &Mutex<Child>) -> std::io::Result<ExitStatus> {
    loop {
        if let Some(status) = lock(child).try_wait()? {
            return Ok(status);
        }

        thread::sleep(Duration::from_millis(50));
    }
}

fn terminate(child: &Mutex<Child>) -> std::io::Result<ExitStatus> {
    let mut child = lock(child);
    // Already exited children report an error here, `wait` still reaps them.
    let _ = child.kill();
    child.wait()
}
