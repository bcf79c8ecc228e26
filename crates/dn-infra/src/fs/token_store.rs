use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dn_core::ports::{TokenStoreError, TokenStorePort};
use dn_core::Token;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Persists the pairing token as `{"token": "..."}`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write to a sibling temp file, then rename over the target so readers
    /// only ever see the old or the new token.
    fn atomic_write(&self, content: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create token dir failed: {}", dir.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("write temp token failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "rename temp token to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

impl TokenStorePort for FileTokenStore {
    fn load(&self) -> Option<Token> {
        let content = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved token");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read token file");
                return None;
            }
        };

        match serde_json::from_str::<TokenFile>(&content) {
            Ok(file) if !file.token.trim().is_empty() => Some(Token::new(file.token)),
            Ok(_) => {
                warn!(path = %self.path.display(), "token file holds an empty token");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed token file, ignoring");
                None
            }
        }
    }

    fn save(&self, token: &Token) -> Result<(), TokenStoreError> {
        let content = serde_json::to_string(&TokenFile {
            token: token.as_str().to_string(),
        })
        .map_err(|e| TokenStoreError::Write(e.to_string()))?;

        self.atomic_write(&content)
            .map_err(|e| TokenStoreError::Write(format!("{e:#}")))?;

        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }
}
