extern crate anyhow;
extern crate image;
extern crate reqwest;
extern crate serde_json;
extern crate std;

pub type RailsignResult<T> = std::result::Result<T, RailsignError>;

#[derive(Debug)]
pub enum RailsignError {
    ConfigError(String),
    HttpError(reqwest::Error),
    ImageError(image::ImageError),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    SimpleError(String),
    WrappedError(anyhow::Error),
}

pub fn make_error(msg: &str) -> RailsignError {
    return RailsignError::SimpleError(msg.to_string());
}

impl std::fmt::Display for RailsignError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            RailsignError::ConfigError(ref msg) => {
                return write!(f, "Config Error: {}", msg);
            },
            RailsignError::HttpError(ref err) => {
                return write!(f, "HTTP Error: {}", err);
            },
            RailsignError::ImageError(ref err) => {
                return write!(f, "Image Error: {}", err);
            },
            RailsignError::IoError(ref err) => {
                return write!(f, "IO Error: {}", err);
            },
            RailsignError::JsonError(ref err) => {
                return write!(f, "JSON Error: {}", err);
            },
            RailsignError::SimpleError(ref msg) => {
                return write!(f, "Error: {}", msg);
            },
            RailsignError::WrappedError(ref err) => {
                return write!(f, "Error: {:#}", err);
            },
        }
    }
}

impl std::error::Error for RailsignError {}

impl From<reqwest::Error> for RailsignError {
    fn from(err: reqwest::Error) -> RailsignError {
        return RailsignError::HttpError(err);
    }
}

impl From<image::ImageError> for RailsignError {
    fn from(err: image::ImageError) -> RailsignError {
        return RailsignError::ImageError(err);
    }
}

impl From<std::io::Error> for RailsignError {
    fn from(err: std::io::Error) -> RailsignError {
        return RailsignError::IoError(err);
    }
}

impl From<serde_json::Error> for RailsignError {
    fn from(err: serde_json::Error) -> RailsignError {
        return RailsignError::JsonError(err);
    }
}

impl From<anyhow::Error> for RailsignError {
    fn from(err: anyhow::Error) -> RailsignError {
        return RailsignError::WrappedError(err);
    }
}
