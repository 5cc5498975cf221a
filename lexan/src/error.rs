use std::{convert::From, fmt, io};

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Regex(regex::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(dest, "{}", err),
            Error::Regex(err) => write!(dest, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<regex::Error> for Error {
    fn from(error: regex::Error) -> Self {
        Error::Regex(error)
    }
}
