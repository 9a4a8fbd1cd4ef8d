// Bearer token signing and verification

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use folio_kernel::settings::AuthSettings;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::{AuthError, Result};

/// Claims carried by every bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// User id
    pub id: i64,
    pub role: String,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Authenticated caller, decoded from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub role: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.id,
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], algorithm: Algorithm, default_ttl: Duration) -> Result<Self> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Config(format!(
                "algorithm {:?} needs a key pair; only HS256/HS384/HS512 are supported",
                algorithm
            )));
        }
        if secret.is_empty() {
            return Err(AuthError::Config("signing secret is empty".to_string()));
        }

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
        })
    }

    /// Build from the `auth` settings section
    pub fn from_settings(settings: &AuthSettings) -> Result<Self> {
        let secret = settings
            .secret_key
            .as_deref()
            .ok_or_else(|| AuthError::Config("auth.secret_key is not set".to_string()))?;
        let algorithm = Algorithm::from_str(&settings.algorithm).map_err(|_| {
            AuthError::Config(format!("unknown signing algorithm '{}'", settings.algorithm))
        })?;

        Self::new(
            secret.as_bytes(),
            algorithm,
            Duration::from_secs(settings.token_ttl_secs),
        )
    }

    /// Sign a token for `identity` that expires after `ttl` (or the configured default)
    pub fn issue(&self, identity: &Identity, ttl: Option<Duration>) -> Result<String> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| Utc::now().timestamp().checked_add(secs))
            .ok_or_else(|| {
                AuthError::Config(format!("token ttl of {}s is out of range", ttl.as_secs()))
            })?;
        let claims = Claims {
            sub: identity.username.clone(),
            id: identity.user_id,
            role: identity.role.clone(),
            exp,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(AuthError::from)
    }

    /// Verify signature and expiry, returning the caller identity
    pub fn verify(&self, token: &str) -> Result<Identity> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e),
            }
        })?;

        Ok(data.claims.into())
    }
}
