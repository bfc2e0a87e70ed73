//! JWT implementation of the `TokenAuthority` port.
//!
//! Issues an HS256 access/refresh pair per login. The two token kinds carry
//! an explicit `kind` claim so a refresh token can never pass an access
//! check or vice versa.

use chrono::Utc;
use domains::{DomainError, Result, TokenAuthority, TokenPair};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
    kind: TokenKind,
}

pub struct JwtAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl JwtAuthority {
    pub fn new(secret: &SecretString, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    fn sign(&self, user_id: Uuid, kind: TokenKind, ttl_secs: u64) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + ttl_secs as i64,
            kind,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| DomainError::Internal(format!("token signing failed: {err}")))
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|err| DomainError::Unauthenticated(format!("invalid token: {err}")))?;
        if data.claims.kind != expected {
            return Err(DomainError::Unauthenticated(
                "wrong token kind".to_string(),
            ));
        }
        Ok(data.claims.sub)
    }
}

impl TokenAuthority for JwtAuthority {
    fn issue(&self, user_id: Uuid) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.sign(user_id, TokenKind::Access, self.access_ttl_secs)?,
            refresh: self.sign(user_id, TokenKind::Refresh, self.refresh_ttl_secs)?,
        })
    }

    fn verify_access(&self, token: &str) -> Result<Uuid> {
        self.verify(token, TokenKind::Access)
    }

    fn refresh(&self, token: &str) -> Result<TokenPair> {
        let user_id = self.verify(token, TokenKind::Refresh)?;
        self.issue(user_id)
    }
}
