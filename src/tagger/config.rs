use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read tagger config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid tagger config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported encoding: {0}")]
    UnknownEncoding(String),
}

/// Character encoding of the files exchanged with the tagger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
}

#[derive(Debug, Error)]
#[error("Tagger output is not valid {encoding}: {message}")]
pub struct DecodeError {
    pub encoding: Encoding,
    pub message: String,
}

impl Encoding {
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            // Characters outside Latin-1 have no representation; the tagger sees '?'.
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }

    pub fn decode(&self, bytes: Vec<u8>) -> Result<String, DecodeError> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).map_err(|e| DecodeError {
                encoding: *self,
                message: e.to_string(),
            }),
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("utf-8"),
            Encoding::Latin1 => f.write_str("iso-8859-1"),
        }
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Encoding::Latin1),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.to_string()
    }
}

/// How to reach the external tagger.
///
/// Commands are split on whitespace into a program and its leading
/// arguments; the input and output file paths are appended last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggerConfig {
    pub tag_command: String,
    pub chunk_command: String,
    #[serde(default)]
    pub encoding: Encoding,
    pub temp_file_in: PathBuf,
    pub temp_file_out: PathBuf,
}

impl TaggerConfig {
    pub fn new(
        tag_command: impl Into<String>,
        chunk_command: impl Into<String>,
        encoding: Encoding,
        temp_file_in: impl Into<PathBuf>,
        temp_file_out: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tag_command: tag_command.into(),
            chunk_command: chunk_command.into(),
            encoding,
            temp_file_in: temp_file_in.into(),
            temp_file_out: temp_file_out.into(),
        }
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
