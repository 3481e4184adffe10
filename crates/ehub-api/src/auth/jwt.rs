// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! ID token signing and validation.

use std::sync::Arc;

use ehub_config::{JwtAlgorithm, JwtConfig};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};

use super::IdTokenClaims;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// JwtManager
// =============================================================================

/// Manager for ID token operations.
///
/// Stands in for the identity provider: it signs the ID tokens minted by
/// [`super::TokenService`] and verifies the bearer token of every request.
#[derive(Clone)]
pub struct JwtManager {
    config: Arc<JwtConfig>,
    algorithm: Algorithm,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtManager {
    /// Creates a new JWT manager with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate, most commonly because
    /// the signing secret is missing or too short.
    pub fn new(config: JwtConfig) -> ApiResult<Self> {
        config
            .validate()
            .map_err(|e| ApiError::internal(format!("Invalid JWT configuration: {}", e)))?;
        let secret = config
            .secret
            .as_ref()
            .map(|s| s.raw().as_bytes().to_vec())
            .ok_or_else(|| ApiError::internal("JWT secret is not configured"))?;

        let algorithm = algorithm_of(config.algorithm);
        let encoding_key = EncodingKey::from_secret(&secret);
        let decoding_key = DecodingKey::from_secret(&secret);

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = config.leeway_secs;

        Ok(Self {
            config: Arc::new(config),
            algorithm,
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Signs the given claims.
    pub fn create_token(&self, claims: &IdTokenClaims) -> ApiResult<String> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to create token: {}", e)))
    }

    /// Starts claims for a uid stamped with this manager's issuer, audience
    /// and lifetime.
    pub fn claims_for(&self, uid: &str) -> IdTokenClaims {
        IdTokenClaims::new(uid, self.lifetime_secs())
            .with_issuer(&self.config.issuer)
            .with_audience(&self.config.audience)
    }

    /// Validates and decodes a token.
    pub fn validate_token(&self, token: &str) -> ApiResult<TokenData<IdTokenClaims>> {
        decode::<IdTokenClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::unauthenticated("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    ApiError::unauthenticated("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    ApiError::unauthenticated("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    ApiError::unauthenticated("Invalid token issuer")
                }
                jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                    ApiError::unauthenticated("Invalid token audience")
                }
                _ => ApiError::unauthenticated(format!("Token validation failed: {}", e)),
            }
        })
    }

    /// Returns the token lifetime in seconds.
    pub fn lifetime_secs(&self) -> i64 {
        i64::try_from(self.config.lifetime_secs).unwrap_or(i64::MAX)
    }

    /// Returns the configured public paths.
    pub fn public_paths(&self) -> &[String] {
        &self.config.public_paths
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("algorithm", &self.algorithm)
            .field("lifetime_secs", &self.config.lifetime_secs)
            .finish()
    }
}

fn algorithm_of(algorithm: JwtAlgorithm) -> Algorithm {
    match algorithm {
        JwtAlgorithm::HS256 => Algorithm::HS256,
        JwtAlgorithm::HS384 => Algorithm::HS384,
        JwtAlgorithm::HS512 => Algorithm::HS512,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ehub_config::SecretValue;
    use ehub_core::{CustomClaims, Role};

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: Some(SecretValue::new(secret)),
            ..JwtConfig::default()
        }
    }

    fn manager() -> JwtManager {
        JwtManager::new(test_config("test-secret-key-that-is-long-enough-for-testing")).unwrap()
    }

    #[test]
    fn test_create_and_validate_token() {
        let manager = manager();
        let claims = manager
            .claims_for("u-1")
            .with_email("ada@hub.test")
            .with_custom_claims(&CustomClaims::for_role(Role::Engineer));

        let token = manager.create_token(&claims).unwrap();
        let data = manager.validate_token(&token).unwrap();

        assert_eq!(data.claims.sub, "u-1");
        assert_eq!(data.claims.email.as_deref(), Some("ada@hub.test"));
        assert_eq!(data.claims.claims_result().claims().role, Role::Engineer);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        assert!(JwtManager::new(JwtConfig::default()).is_err());
        assert!(JwtManager::new(test_config("short")).is_err());
    }

    #[test]
    fn test_expired_token() {
        let manager = manager();
        let mut claims = manager.claims_for("u-1");
        claims.exp = claims.iat - 3600;
        let token = manager.create_token(&claims).unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert_eq!(err.kind(), "unauthenticated");
    }

    #[test]
    fn test_invalid_token() {
        assert!(manager().validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let one = JwtManager::new(test_config("secret-one-for-testing-purposes-0000")).unwrap();
        let two = JwtManager::new(test_config("secret-two-for-testing-purposes-0000")).unwrap();

        let token = one.create_token(&one.claims_for("u-1")).unwrap();
        assert!(two.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience() {
        let manager = manager();
        let claims = IdTokenClaims::new("u-1", 3600)
            .with_issuer("electricianhub")
            .with_audience("someone-else");
        let token = manager.create_token(&claims).unwrap();

        assert!(manager.validate_token(&token).is_err());
    }
}
