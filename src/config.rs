use std::{fmt, path::PathBuf};

use crate::error::RewriteError;

/// Environment variable holding the new cookie value
pub const TOKEN_ENV_VAR: &str = "NEW_COOKIE";

pub const DEFAULT_PLAYLIST_PATH: &str = "channels.m3u";
pub const DEFAULT_STATUS_PATH: &str = "update_status.txt";

/// The new authentication value. Guaranteed to be non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// # Errors
    /// [`RewriteError::MissingToken`] when `value` is empty
    pub fn new(value: impl Into<String>) -> Result<Self, RewriteError> {
        let value = value.into();
        if value.is_empty() {
            return Err(RewriteError::MissingToken);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the secret itself
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} chars>)", self.0.chars().count())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: Token,
    pub playlist_path: PathBuf,
    pub status_path: PathBuf,
}

impl Config {
    /// # Errors
    /// [`RewriteError::MissingToken`] when `token` is empty
    pub fn new(
        token: impl Into<String>,
        playlist_path: impl Into<PathBuf>,
        status_path: impl Into<PathBuf>,
    ) -> Result<Self, RewriteError> {
        Ok(Self {
            token: Token::new(token)?,
            playlist_path: playlist_path.into(),
            status_path: status_path.into(),
        })
    }

    /// Reads the token from [`TOKEN_ENV_VAR`].
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    ///
    /// # Errors
    /// [`RewriteError::MissingToken`] when the variable is unset, empty or not valid unicode
    pub fn from_env(
        playlist_path: impl Into<PathBuf>,
        status_path: impl Into<PathBuf>,
    ) -> Result<Self, RewriteError> {
        Self::from_lookup(std::env::var(TOKEN_ENV_VAR).ok(), playlist_path, status_path)
    }

    /// Builds a config from a token that may not have been provided at all
    ///
    /// # Errors
    /// [`RewriteError::MissingToken`] when `token` is `None` or empty
    pub fn from_lookup(
        token: Option<String>,
        playlist_path: impl Into<PathBuf>,
        status_path: impl Into<PathBuf>,
    ) -> Result<Self, RewriteError> {
        let token = token.ok_or(RewriteError::MissingToken)?;
        Self::new(token, playlist_path, status_path)
    }
}
