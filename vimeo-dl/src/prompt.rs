use crate::error::{Error, Result, UrlError};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use url::Url;

pub const PLAYER_HOST: &str = "player.vimeo.com";

/// Accepts anything mentioning the vimeo player host; yt-dlp does the rest.
pub fn validate_player_url(input: &str) -> Result<String, UrlError> {
    let input = input.trim();

    if input.contains(PLAYER_HOST) && !input.contains(char::is_whitespace) {
        Ok(input.to_owned())
    } else {
        Err(UrlError::NotPlayer(input.to_owned(), PLAYER_HOST))
    }
}

/// The embedding page has to be a full `http(s)://host/...` url since it is
/// sent verbatim as the referer.
pub fn validate_referer_url(input: &str) -> Result<String, UrlError> {
    let input = input.trim();
    let url = Url::parse(input).map_err(|e| UrlError::Malformed(input.to_owned(), e))?;

    if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() {
        Ok(url.into())
    } else {
        Err(UrlError::NotHttp(input.to_owned()))
    }
}

pub struct Prompter {
    pub raw: bool,
}

impl Prompter {
    pub fn player_url(&self) -> Result<String> {
        self.ask(
            "player_url",
            "Enter vimeo player url (e.g. https://player.vimeo.com/video/...)",
            validate_player_url,
        )
    }

    pub fn referer_url(&self) -> Result<String> {
        self.ask(
            "referer_url",
            "Enter the page url where the video is embedded",
            validate_referer_url,
        )
    }

    fn ask(
        &self,
        name: &str,
        message: &str,
        validate: fn(&str) -> Result<String, UrlError>,
    ) -> Result<String> {
        if self.raw {
            let stdin = io::stdin();
            return ask_raw(message, validate, &mut stdin.lock(), &mut io::stdout());
        }

        let answer = requestty::prompt_one(
            requestty::Question::input(name)
                .message(message.to_owned())
                .validate(move |value, _| validate(value).map(|_| ()).map_err(|e| e.to_string()))
                .build(),
        )?;

        // Validated above, normalise again to get the trimmed value.
        Ok(validate(answer.as_string().unwrap_or_default())?)
    }
}

/// Plain stdin prompt for terminals requestty can't drive.
fn ask_raw<R: BufRead, W: Write>(
    message: &str,
    validate: fn(&str) -> Result<String, UrlError>,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    loop {
        write!(output, "{}:\n> ", message)?;
        output.flush()?;

        let mut line = String::new();

        if input.read_line(&mut line)? == 0 {
            return Err(Error::Cancelled);
        }

        match validate(&line) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(output, "{}: {}", "invalid".red(), e)?,
        }
    }
}
