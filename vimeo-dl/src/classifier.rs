//! Classification of yt-dlp output lines.
//!
//! yt-dlp does not promise a stable output format, so every rule here is a
//! prefix or substring check. Anything not recognised becomes [`Category::Ignore`].

const DOWNLOAD_MARKER: &str = "[download]";
const EXTRACTOR_MARKER: &str = "[vimeo";
const INFO_MARKER: &str = "[info]";
const MUXER_MARKERS: [&str; 2] = ["[Merger]", "[ffmpeg]"];
const FIXUP_MARKERS: [&str; 2] = ["[FixupM3u8]", "[FixupM4a]"];
const BYTE_UNITS: [&str; 9] = [
    "KiB", "MiB", "GiB", "TiB", "KB", "MB", "GB", "TB", "bytes",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Progress,
    StatusInfo,
    StatusMerge,
    ErrorLine,
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedEvent {
    pub category: Category,
    pub text: Option<String>,
}

impl ClassifiedEvent {
    fn new(category: Category, text: impl Into<String>) -> Self {
        Self {
            category,
            text: Some(text.into()),
        }
    }

    fn ignore() -> Self {
        Self {
            category: Category::Ignore,
            text: None,
        }
    }
}

pub fn classify(line: &str) -> ClassifiedEvent {
    let lower = line.to_lowercase();

    if is_progress(line) {
        return ClassifiedEvent::new(
            Category::Progress,
            line.replacen(DOWNLOAD_MARKER, "Progress:", 1),
        );
    }

    if line.starts_with(EXTRACTOR_MARKER) {
        return if lower.contains("extracting") {
            ClassifiedEvent::new(Category::StatusInfo, "Extracting info...")
        } else if lower.contains("downloading webpage") {
            ClassifiedEvent::new(Category::StatusInfo, "Fetching page...")
        } else {
            ClassifiedEvent::ignore()
        };
    }

    if lower.contains("merging formats")
        || (MUXER_MARKERS.iter().any(|x| line.contains(x)) && lower.contains("merging"))
    {
        return ClassifiedEvent::new(Category::StatusMerge, "Merging streams...");
    }

    if line.starts_with(INFO_MARKER) && line.contains("Video title:") {
        return ClassifiedEvent::new(Category::StatusInfo, line.replacen(INFO_MARKER, "Info:", 1));
    }

    if line.starts_with(DOWNLOAD_MARKER) {
        if line.contains("Destination:") {
            return ClassifiedEvent::ignore();
        }

        if line.contains("has already been downloaded") {
            return ClassifiedEvent::new(
                Category::StatusInfo,
                "Video already downloaded. Skipping...",
            );
        }
    }

    if FIXUP_MARKERS.iter().any(|x| line.starts_with(x)) {
        return ClassifiedEvent::new(Category::StatusInfo, "Finalizing stream...");
    }

    if is_error(line, &lower) {
        return ClassifiedEvent::new(Category::ErrorLine, line);
    }

    ClassifiedEvent::ignore()
}

fn is_progress(line: &str) -> bool {
    line.starts_with(DOWNLOAD_MARKER)
        && line.contains('%')
        && BYTE_UNITS.iter().any(|x| line.contains(x))
        && line.contains(" of ")
}

fn is_error(line: &str, lower: &str) -> bool {
    lower.starts_with("error:")
        || lower.starts_with("yt-dlp: error:")
        || (line.starts_with("WARNING:") && lower.contains("unable to download video data"))
        || (line.contains("ERROR:") && lower.contains("giving up"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_keeps_everything_after_marker() {
        let event = classify("[download]  42.0% of  120.50MiB at  5.00MiB/s ETA 00:10");
        assert_eq!(event.category, Category::Progress);
        assert_eq!(
            event.text.as_deref(),
            Some("Progress:  42.0% of  120.50MiB at  5.00MiB/s ETA 00:10")
        );
    }

    #[test]
    fn fragment_progress_with_estimate() {
        let event = classify("[download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)");
        assert_eq!(event.category, Category::Progress);
        assert_eq!(
            event.text.as_deref(),
            Some("Progress:   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)")
        );
    }

    #[test]
    fn download_line_without_unit_is_not_progress() {
        assert_eq!(classify("[download] 100% of something").category, Category::Ignore);
    }

    #[test]
    fn extractor_lines() {
        assert_eq!(
            classify("[vimeo] Extracting URL: https://player.vimeo.com/video/1").text.as_deref(),
            Some("Extracting info...")
        );
        assert_eq!(
            classify("[vimeo:player] 1: Downloading webpage").text.as_deref(),
            Some("Fetching page...")
        );
        assert_eq!(
            classify("[vimeo] 1: Downloading JSON metadata"),
            ClassifiedEvent::ignore()
        );
    }

    #[test]
    fn merge_lines() {
        let merge = ClassifiedEvent::new(Category::StatusMerge, "Merging streams...");
        assert_eq!(classify("[Merger] Merging formats into \"a.mp4\""), merge);
        assert_eq!(classify("[ffmpeg] MERGING video and audio"), merge);
        assert_eq!(classify("[ffmpeg] Fixing container"), ClassifiedEvent::ignore());
    }

    #[test]
    fn title_line_is_relabelled() {
        let event = classify("[info] Video title: A Short Film");
        assert_eq!(event.category, Category::StatusInfo);
        assert_eq!(event.text.as_deref(), Some("Info: Video title: A Short Film"));
    }

    #[test]
    fn download_noise_and_skips() {
        assert_eq!(
            classify("[download] Destination: /tmp/a.f1.mp4"),
            ClassifiedEvent::ignore()
        );
        assert_eq!(
            classify("[download] /home/u/a.mp4 has already been downloaded").text.as_deref(),
            Some("Video already downloaded. Skipping...")
        );
    }

    #[test]
    fn fixup_lines() {
        for line in ["[FixupM3u8] Fixing MPEG-TS in MP4 container", "[FixupM4a] Correcting container"] {
            assert_eq!(classify(line).text.as_deref(), Some("Finalizing stream..."));
        }
    }

    #[test]
    fn error_lines_keep_original_text() {
        for line in [
            "ERROR: giving up after 3 retries",
            "error: no such option",
            "yt-dlp: error: invalid format",
            "WARNING: Unable to download video data: HTTP Error 403",
            "[download] Got error. ERROR: fragment 3 not found, giving up",
        ] {
            let event = classify(line);
            assert_eq!(event.category, Category::ErrorLine, "{line}");
            assert_eq!(event.text.as_deref(), Some(line));
        }
    }

    #[test]
    fn unknown_lines_are_ignored() {
        for line in ["", "   ", "[aria2c] 0B/0B CN:1", "WARNING: something else", "random"] {
            assert_eq!(classify(line), ClassifiedEvent::ignore(), "{line:?}");
        }
    }

    #[test]
    fn classification_is_repeatable() {
        let line = "[download]  99.9% of 1.00GiB at 10.00MiB/s ETA 00:00";
        assert_eq!(classify(line), classify(line));
    }
}
