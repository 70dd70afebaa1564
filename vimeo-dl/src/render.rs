use crate::classifier::{Category, ClassifiedEvent};
use std::io::{self, Write};

pub const LINE_WIDTH: usize = 80;
const SPINNER_FRAMES: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];
const SPINNER_EVERY: usize = 5;

/// Per-attempt display state.
///
/// A fresh value is created for every backend attempt so nothing (cursor
/// position, spinner phase, captured error) carries over between retries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub cursor_at_line_start: bool,
    pub spinner_phase: usize,
    pub spinner_suppress_counter: usize,
    pub last_error_text: Option<String>,
    showing_progress: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            cursor_at_line_start: true,
            spinner_phase: 0,
            spinner_suppress_counter: 0,
            last_error_text: None,
            showing_progress: false,
        }
    }
}

impl RenderState {
    pub fn showing_progress(&self) -> bool {
        self.showing_progress
    }

    pub fn render<W: Write>(&mut self, event: &ClassifiedEvent, out: &mut W) -> io::Result<()> {
        let text = event.text.as_deref().unwrap_or_default();

        match event.category {
            Category::Progress => {
                write!(out, "{text:<LINE_WIDTH$}\r")?;
                self.cursor_at_line_start = false;
                self.showing_progress = true;
            }
            Category::StatusInfo | Category::StatusMerge => {
                self.close_line(out)?;
                writeln!(out, "{text:<LINE_WIDTH$}")?;
                self.cursor_at_line_start = true;
            }
            Category::ErrorLine => {
                self.close_line(out)?;
                writeln!(out, "{text}")?;
                self.cursor_at_line_start = true;
                self.last_error_text = Some(text.to_owned());
            }
            Category::Ignore => {
                if self.showing_progress {
                    return Ok(());
                }

                self.spinner_suppress_counter += 1;

                if self.spinner_suppress_counter % SPINNER_EVERY == 0 {
                    self.spinner_phase = (self.spinner_phase + 1) % SPINNER_FRAMES.len();
                    let frame = format!("{} Processing...", SPINNER_FRAMES[self.spinner_phase]);
                    write!(out, "{frame:<LINE_WIDTH$}\r")?;
                    self.cursor_at_line_start = false;
                }
            }
        }

        out.flush()
    }

    /// Leaves the cursor at the start of a clean line once the stream has ended.
    pub fn finish<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.cursor_at_line_start {
            writeln!(out)?;
            self.cursor_at_line_start = true;
        }

        out.flush()
    }

    fn close_line<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.cursor_at_line_start {
            writeln!(out)?;
        }

        self.showing_progress = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn event(category: Category, text: Option<&str>) -> ClassifiedEvent {
        ClassifiedEvent {
            category,
            text: text.map(str::to_owned),
        }
    }

    fn ignore() -> ClassifiedEvent {
        event(Category::Ignore, None)
    }

    fn feed(state: &mut RenderState, events: &[ClassifiedEvent]) -> String {
        let mut out = Vec::new();

        for event in events {
            state.render(event, &mut out).unwrap();
        }

        String::from_utf8(out).unwrap()
    }

    #[test]
    fn progress_overwrites_in_place() {
        let mut state = RenderState::default();
        let out = feed(
            &mut state,
            &[
                event(Category::Progress, Some("Progress: 1%")),
                event(Category::Progress, Some("Progress: 2%")),
            ],
        );

        assert_eq!(
            out,
            format!("{:<80}\r{:<80}\r", "Progress: 1%", "Progress: 2%")
        );
        assert!(!state.cursor_at_line_start);
        assert!(state.showing_progress());
    }

    #[test]
    fn status_closes_progress_line() {
        let mut state = RenderState::default();
        let out = feed(
            &mut state,
            &[
                event(Category::Progress, Some("Progress: 50%")),
                event(Category::StatusMerge, Some("Merging streams...")),
            ],
        );

        assert_eq!(
            out,
            format!("{:<80}\r\n{:<80}\n", "Progress: 50%", "Merging streams...")
        );
        assert!(state.cursor_at_line_start);
        assert!(!state.showing_progress());
    }

    #[test]
    fn status_at_line_start_has_no_leading_newline() {
        let mut state = RenderState::default();
        let out = feed(&mut state, &[event(Category::StatusInfo, Some("Fetching page..."))]);
        assert_eq!(out, format!("{:<80}\n", "Fetching page..."));
    }

    #[test]
    fn error_line_is_captured() {
        let mut state = RenderState::default();
        let out = feed(
            &mut state,
            &[
                event(Category::Progress, Some("Progress: 3%")),
                event(Category::ErrorLine, Some("ERROR: giving up after 3 retries")),
            ],
        );

        assert!(out.ends_with("\r\nERROR: giving up after 3 retries\n"));
        assert!(state.cursor_at_line_start);
        assert_eq!(
            state.last_error_text.as_deref(),
            Some("ERROR: giving up after 3 retries")
        );
    }

    #[test]
    fn ignore_never_clobbers_progress() {
        let mut state = RenderState::default();
        feed(&mut state, &[event(Category::Progress, Some("Progress: 9%"))]);
        let before = state.clone();

        let out = feed(&mut state, &vec![ignore(); 12]);

        assert!(out.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn spinner_every_fifth_ignore() {
        let mut state = RenderState::default();

        let out = feed(&mut state, &vec![ignore(); 4]);
        assert!(out.is_empty());
        assert!(state.cursor_at_line_start);

        let out = feed(&mut state, &[ignore()]);
        assert_eq!(out, format!("{:<80}\r", "⣽ Processing..."));
        assert_eq!(state.spinner_phase, 1);
        assert!(!state.cursor_at_line_start);

        feed(&mut state, &vec![ignore(); 35]);
        assert_eq!(state.spinner_suppress_counter, 40);
        assert_eq!(state.spinner_phase, 0);
    }

    #[test]
    fn finish_closes_open_line_once() {
        let mut state = RenderState::default();
        let mut out = Vec::new();

        state.render(&event(Category::Progress, Some("p")), &mut out).unwrap();
        state.finish(&mut out).unwrap();
        state.finish(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), format!("{:<80}\r\n", "p"));
    }

    #[test]
    fn finish_is_silent_at_line_start() {
        let mut state = RenderState::default();
        let mut out = Vec::new();
        state.finish(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn cursor_tracks_last_event() {
        let lines = [
            "[vimeo] Extracting URL: https://player.vimeo.com/video/1",
            "[info] Video title: Clip",
            "[download]  10.0% of 5.00MiB at 1.00MiB/s ETA 00:04",
            "[download] Destination: clip.mp4",
            "[Merger] Merging formats into \"clip.mp4\"",
        ];
        let expected = [true, true, false, false, true];
        let mut state = RenderState::default();
        let mut out = Vec::new();

        for (line, at_start) in lines.iter().zip(expected) {
            state.render(&classify(line), &mut out).unwrap();
            assert_eq!(state.cursor_at_line_start, at_start, "{line}");
        }
    }
}
