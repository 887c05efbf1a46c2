use anyhow::Context;
use jsonwebtoken::{get_current_timestamp, Algorithm};
use serde::Serialize;

use crate::{error::StoreError, ServiceAccount};

use super::Credentials;

/// Static bearer token accepted by the Firestore emulator, granting admin
/// access that bypasses security rules.
const EMULATOR_TOKEN: &str = "owner";

#[derive(Clone)]
pub(crate) struct FirestoreTokenProvider {
    credentials: Credentials,
    current_token: Option<Token>,
}

#[derive(Clone)]
struct Token {
    jwt: String,
    /// Seconds since the UNIX epoch after which a new token is minted.
    expires_at: u64,
}

impl FirestoreTokenProvider {
    pub(crate) fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            current_token: None,
        }
    }

    pub(crate) fn get_token(&mut self) -> Result<String, StoreError> {
        let service_account = match &self.credentials {
            Credentials::Emulator { .. } => return Ok(EMULATOR_TOKEN.to_string()),
            Credentials::ServiceAccount(service_account) => service_account,
        };

        match &self.current_token {
            Some(token) if token.expires_at > get_current_timestamp() => Ok(token.jwt.clone()),
            _ => {
                let token = create_jwt(service_account)?;
                let jwt = token.jwt.clone();
                self.current_token = Some(token);
                Ok(jwt)
            }
        }
    }
}

fn create_jwt(service_account: &ServiceAccount) -> Result<Token, anyhow::Error> {
    let mut header = jsonwebtoken::Header::new(Algorithm::RS256);
    header.kid = Some(service_account.private_key_id.clone());

    let valid_duration = 60 * 60;
    // Renew five minutes early so a token never expires mid-request.
    let expiry_buffer = 5 * 60;

    let issued_at_time = get_current_timestamp();
    let claims = JwtClaims {
        iss: &service_account.client_email,
        sub: &service_account.client_email,
        aud: "https://firestore.googleapis.com/",
        iat: issued_at_time,
        exp: issued_at_time + valid_duration,
        uid: &service_account.client_id,
    };

    let encoding_key =
        jsonwebtoken::EncodingKey::from_rsa_pem(service_account.private_key.as_ref())
            .context("Failed to create JWT encoding key from the given private key")?;

    let jwt =
        jsonwebtoken::encode(&header, &claims, &encoding_key).context("Failed to create JWT")?;

    Ok(Token {
        jwt,
        expires_at: claims.exp - expiry_buffer,
    })
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
    uid: &'a str,
}
