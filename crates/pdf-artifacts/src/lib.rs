//! One-shot storage for generated documents
//!
//! A finished PDF is parked under a random token until the client downloads
//! it. The first successful download removes it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::Mutex;

/// Length of a token in hex characters (256 random bits)
pub const TOKEN_HEX_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("Invalid or expired token")]
    NotFound,
    #[error("Malformed token")]
    InvalidToken,
}

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Handle to a stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactToken(String);

impl ArtifactToken {
    /// A fresh token from 32 random bytes
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Accept exactly 64 lowercase hex characters
    pub fn parse(value: &str) -> Result<Self> {
        let well_formed = value.len() == TOKEN_HEX_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(ArtifactError::InvalidToken)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ArtifactToken {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ArtifactToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token to bytes map shared by all requests.
///
/// Entries live until they are taken; there is no expiry.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    entries: Mutex<HashMap<ArtifactToken, Vec<u8>>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes under a new token
    pub async fn put(&self, bytes: Vec<u8>) -> ArtifactToken {
        let mut entries = self.entries.lock().await;
        // Never overwrite a pending artifact
        let token = loop {
            let token = ArtifactToken::generate();
            if !entries.contains_key(&token) {
                break token;
            }
        };
        tracing::debug!(size = bytes.len(), stored = entries.len() + 1, "Stored artifact");
        entries.insert(token.clone(), bytes);
        token
    }

    /// Remove and return the bytes for a token
    pub async fn take(&self, token: &ArtifactToken) -> Result<Vec<u8>> {
        let bytes = self
            .entries
            .lock()
            .await
            .remove(token)
            .ok_or(ArtifactError::NotFound)?;
        tracing::debug!(size = bytes.len(), "Released artifact");
        Ok(bytes)
    }

    /// Whether a token is still waiting to be downloaded
    pub async fn contains(&self, token: &ArtifactToken) -> bool {
        self.entries.lock().await.contains_key(token)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
