use crate::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use core_types::{Role, UserProfile};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a session token asserts about its bearer.
///
/// `role` is the role the session acts as, which for admins may differ from
/// the stored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, profile: &UserProfile, role: Role) -> Result<String, AuthError> {
        self.issue_at(profile, role, Utc::now())
    }

    pub fn issue_at(
        &self,
        profile: &UserProfile,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: profile.id,
            name: profile.full_name.clone(),
            email: profile.email.clone(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Checks signature and expiry and returns the claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a-test-secret-that-is-long-enough-1234";

    fn profile() -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            full_name: "Ada Admin".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: None,
            avatar_url: None,
            role: Role::Admin,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issued_token_verifies_with_acting_role() {
        let keys = SessionKeys::new(SECRET, Duration::hours(1));
        let profile = profile();
        let token = keys.issue(&profile, Role::Driver).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, profile.id);
        assert_eq!(claims.role, Role::Driver);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = SessionKeys::new(SECRET, Duration::hours(1));
        let token = keys
            .issue_at(&profile(), Role::Admin, Utc::now() - Duration::days(2))
            .unwrap();
        assert_eq!(keys.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_token_from_another_secret_is_rejected() {
        let issuer = SessionKeys::new(SECRET, Duration::hours(1));
        let verifier = SessionKeys::new("another-secret-that-is-long-enough-5678", Duration::hours(1));
        let token = issuer.issue(&profile(), Role::Admin).unwrap();
        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let keys = SessionKeys::new(SECRET, Duration::hours(1));
        assert_eq!(keys.verify("not.a.token"), Err(AuthError::InvalidToken));
    }
}
