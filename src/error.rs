use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot locate the home directory to find the configuration file")]
    Home,

    #[error("cannot read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("base_url `{url}` is not a valid URL: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("portal request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("login response carries no sessid token; wrong credentials or changed portal markup")]
    TokenMissing,

    #[error("portal answered {status} during {context}")]
    Server {
        status: StatusCode,
        context: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error kind, so an external scheduler can
    /// tell configuration, network, auth and server failures apart.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            Error::Io(_) => 1,
            Error::Home
            | Error::ConfigRead { .. }
            | Error::ConfigInvalid { .. }
            | Error::BaseUrl { .. } => 3,
            Error::Network(_) => 4,
            Error::TokenMissing => 5,
            Error::Server { .. } => 6,
        }
    }
}
