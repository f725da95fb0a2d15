//! Shared helper utilities.

use std::fmt;
use std::fs;
use std::io::{self, Read};

use crate::Result;
use crate::core::view::Tone;

/// Logs errors to standard error in a structured format.
pub fn log_err<E>(program: &str, err: E)
where
    E: fmt::Display,
{
    eprintln!("\x1b[1m{program}\x1b[0m: \x1b[1;91merror\x1b[0m: {err}");
}

/// Wraps `text` in the ANSI colour of `tone`.
pub fn paint(text: &str, tone: Tone) -> String {
    let code = match tone {
        Tone::Plain => return text.to_string(),
        Tone::Positive => "92",
        Tone::Negative => "94",
        Tone::Float => "96",
        Tone::Error => "1;91",
        Tone::Unavailable => "2",
    };
    format!("\x1b[{code}m{text}\x1b[0m")
}

/// Reads a register dump from `path`, or from standard input if `None`.
pub fn read_dump(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(paint("42", Tone::Plain), "42");
    }

    #[test]
    fn tones_are_wrapped() {
        assert_eq!(paint("-1", Tone::Negative), "\x1b[94m-1\x1b[0m");
        assert_eq!(paint("nan", Tone::Error), "\x1b[1;91mnan\x1b[0m");
        assert_eq!(paint("1.5", Tone::Float), "\x1b[96m1.5\x1b[0m");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_dump(Some("/nonexistent/regview/dump.txt")),
            Err(crate::Error::Io(_))
        ));
    }
}
