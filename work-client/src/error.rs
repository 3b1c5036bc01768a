use config_file::ConfigFileError;
use std::io::Error as StdError;
use std::string::FromUtf8Error;

#[derive(Debug)]
pub enum Error {
    IO(StdError),
    Network(StdError),
    Decode(FromUtf8Error),
    PayloadTooLarge(usize),
    Config(ConfigFileError),
}

impl From<StdError> for Error {
    fn from(value: StdError) -> Self {
        Error::IO(value)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(value: FromUtf8Error) -> Self {
        Error::Decode(value)
    }
}

impl From<ConfigFileError> for Error {
    fn from(value: ConfigFileError) -> Self {
        Error::Config(value)
    }
}

impl Error {
    /// Reclassifies plain I/O failures as socket failures.
    pub fn on_socket(self) -> Self {
        match self {
            Error::IO(e) => Error::Network(e),
            other => other,
        }
    }
}
