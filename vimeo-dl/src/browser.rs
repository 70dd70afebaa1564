use clap::ValueEnum;
use std::fmt;

/// Browser whose cookie store is handed to yt-dlp via `--cookies-from-browser`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Brave,
    Chromium,
}

impl Browser {
    /// Order in which cookie stores are tried when none are given explicitly.
    pub const ALL: [Browser; 6] = [
        Browser::Chrome,
        Browser::Firefox,
        Browser::Safari,
        Browser::Edge,
        Browser::Brave,
        Browser::Chromium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Safari => "safari",
            Self::Edge => "edge",
            Self::Brave => "brave",
            Self::Chromium => "chromium",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Removes repeated entries while keeping the first occurrence of each.
pub fn dedup(browsers: Vec<Browser>) -> Vec<Browser> {
    let mut unique = Vec::with_capacity(browsers.len());

    for browser in browsers {
        if !unique.contains(&browser) {
            unique.push(browser);
        }
    }

    unique
}
