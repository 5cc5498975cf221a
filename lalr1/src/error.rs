use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Grammar(String),
}

impl fmt::Display for Error {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(dest, "{}", e),
            Error::Grammar(message) => write!(dest, "{}", message),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}
