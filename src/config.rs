use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};
use crate::parser;

/// File name under the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".b24timeman.conf";

/// Printed when no configuration file exists yet.
pub const TEMPLATE: &str = "\
[Bitrix]
base_url = https://your-bitrix24-instance

[User]
login = yourname@example.com
pass = your_secret_pass
user_agent = Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:73.0) Gecko/20100101 Firefox/73.0
";

/// Portal coordinates and credentials, loaded once per invocation.
#[derive(Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub login: String,
    pub password: String,
    pub user_agent: String,
}

impl Config {
    /// Reads the configuration file.
    ///
    /// `Ok(None)` means the file does not exist; the caller is expected to
    /// print the setup template rather than treat that as a failure. Field
    /// contents are not validated here. A bad URL or empty credentials show
    /// up later as HTTP-level failures.
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path).await {
            Ok(text) => Self::from_ini(&text, path).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source: err,
            }),
        }
    }

    fn from_ini(text: &str, path: &Path) -> Result<Self> {
        let ini = parser::parse(text).map_err(|err| Error::ConfigInvalid {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let field = |section: &str, key: &str| -> Result<String> {
            ini.get(section, key)
                .map(str::to_owned)
                .ok_or_else(|| Error::ConfigInvalid {
                    path: path.to_path_buf(),
                    reason: format!("missing `{key}` in section [{section}]"),
                })
        };

        Ok(Config {
            base_url: field("Bitrix", "base_url")?,
            login: field("User", "login")?,
            password: field("User", "pass")?,
            user_agent: field("User", "user_agent")?,
        })
    }
}

/// The fixed per-user location, `<home>/.b24timeman.conf`.
pub fn default_path() -> Result<PathBuf> {
    let home = homedir::my_home().map_err(|_| Error::Home)?.ok_or(Error::Home)?;
    Ok(home.join(CONFIG_FILE_NAME))
}
