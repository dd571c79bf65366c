use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDateTime;

/// Asks for a value on stdin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Prompt<'a> {
    msg: &'a str,
}

impl<'a> Prompt<'a> {
    #[inline]
    pub fn new(msg: &'a str) -> Self {
        Self { msg }
    }

    /// Reads lines until one parses into a valid `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read or is closed.
    pub fn read_valid<T>(&self) -> io::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let stdin = io::stdin();
        self.read_valid_from(&mut stdin.lock(), &mut io::stdout())
    }

    fn read_valid_from<T, R, W>(&self, reader: &mut R, writer: &mut W) -> io::Result<T>
    where
        T: FromStr,
        T::Err: Display,
        R: BufRead,
        W: Write,
    {
        loop {
            write!(writer, "{}: ", self.msg)?;
            writer.flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }

            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(err) => writeln!(writer, "Failed to parse input: {}", err)?,
            }
        }
    }
}

/// Returns `value` or asks for it if it is `None`.
pub fn or_prompt<T>(value: Option<T>, msg: &str) -> io::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(value) => Ok(value),
        None => Prompt::new(msg).read_valid(),
    }
}

/// Parses a date and time like `2026-11-20 18:30` or `2026-11-20T18:30:00`.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
}

/// Parses a number counted from `1`, like the rounds and matches shown to users, into an index.
pub fn parse_index(s: &str) -> Result<usize, String> {
    let number: usize = s.parse().map_err(|err: std::num::ParseIntError| err.to_string())?;

    number
        .checked_sub(1)
        .ok_or_else(|| String::from("numbers start at 1"))
}
