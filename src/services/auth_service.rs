use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpMessage;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Config, Environment, TokenTransport};

pub const TOKEN_COOKIE: &str = "token";

/// Claim names the server owns; caller-supplied values are discarded.
const RESERVED_CLAIMS: [&str; 6] = ["email", "iat", "exp", "nbf", "jti", "aud"];

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub email: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String,
    /// Whatever else the caller put in the identity payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identity payload posted to `/jwt`. Trusted verbatim.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SessionRequest {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("no session token")]
    MissingToken,
    #[error("malformed Authorization header")]
    MalformedHeader,
    #[error("token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens for one configured transport.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    transport: TokenTransport,
    environment: Environment,
}

impl AuthService {
    pub fn new(secret: &str, ttl_secs: i64, transport: TokenTransport, environment: Environment) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
            transport,
            environment,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.token_ttl_secs,
            config.token_transport,
            config.environment,
        )
    }

    pub fn transport(&self) -> TokenTransport {
        self.transport
    }

    // Generate JWT token
    pub fn issue(&self, request: SessionRequest) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let mut extra = request.extra;
        for claim in RESERVED_CLAIMS {
            extra.remove(claim);
        }

        let claims = Claims {
            email: request.email,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    // Verify JWT token
    pub fn verify(&self, token: &str) -> Result<Claims, AuthRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Pulls the token from wherever the configured transport carries it.
    pub fn extract_token<M: HttpMessage>(&self, message: &M) -> Result<String, AuthRejection> {
        match self.transport {
            TokenTransport::Header => {
                let header = message
                    .headers()
                    .get(AUTHORIZATION)
                    .ok_or(AuthRejection::MissingToken)?;
                let value = header.to_str().map_err(|_| AuthRejection::MalformedHeader)?;

                match value.strip_prefix("Bearer ").map(str::trim) {
                    Some(token) if !token.is_empty() => Ok(token.to_string()),
                    _ => Err(AuthRejection::MalformedHeader),
                }
            }
            TokenTransport::Cookie => message
                .cookie(TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .filter(|token| !token.is_empty())
                .ok_or(AuthRejection::MissingToken),
        }
    }

    pub fn authenticate<M: HttpMessage>(&self, message: &M) -> Result<Claims, AuthRejection> {
        let token = self.extract_token(message)?;
        self.verify(&token)
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = self.base_cookie(token);
        cookie.set_max_age(CookieDuration::seconds(self.ttl.num_seconds()));
        cookie
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base_cookie(String::new());
        cookie.make_removal();
        cookie
    }

    fn base_cookie(&self, value: String) -> Cookie<'static> {
        let production = self.environment == Environment::Production;

        Cookie::build(TOKEN_COOKIE, value)
            .path("/")
            .http_only(true)
            .secure(production)
            .same_site(if production { SameSite::None } else { SameSite::Strict })
            .finish()
    }
}
