use std::{env, fs::File, path::Path};

use anyhow::Context;
use serde::Deserialize;

/// Service account information contained within the service account JSON file
/// that you can download from Firebase.
///
/// `Serialize`, `Display`, and `Debug` are intentionally not implemented to
/// avoid accidentally leaking credentials.
#[derive(Deserialize, Clone)]
pub struct ServiceAccount {
    pub project_id: String,
    pub private_key: String,
    pub private_key_id: String,
    pub client_email: String,
    pub client_id: String,
}

impl ServiceAccount {
    /// Reads a service account JSON file, such as the one
    /// `GOOGLE_APPLICATION_CREDENTIALS` points at.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let file_reader = File::open(path).with_context(|| {
            format!("Failed to read service account JSON file '{}'", path.display())
        })?;
        let service_account = serde_json::from_reader(file_reader)
            .context("Could not extract service account details from file")?;

        Ok(service_account)
    }

    /// Builds a service account from the `FIREBASE_*` environment variables.
    /// Escaped newlines in `FIREBASE_PRIVATE_KEY` are unescaped.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let var = |name: &str| env::var(name).with_context(|| format!("{name} is not set"));

        Ok(Self {
            project_id: var("FIREBASE_PROJECT_ID")?,
            client_id: var("FIREBASE_CLIENT_ID")?,
            client_email: var("FIREBASE_CLIENT_EMAIL")?,
            private_key_id: var("FIREBASE_PRIVATE_KEY_ID")?,
            private_key: var("FIREBASE_PRIVATE_KEY")?.replace(r"\n", "\n"),
        })
    }
}
