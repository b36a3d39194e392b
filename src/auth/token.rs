//! Bearer-token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the user id as subject and the configured
//! domain as both issuer and audience. Expiry (24h) is the only lifecycle
//! bound; there is no revocation.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by every issued token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issuer domain
    pub iss: String,
    /// Audience domain
    pub aud: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Not before (Unix seconds)
    pub nbf: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

const TOKEN_TTL_HOURS: i64 = 24;

/// Issue a signed token for a validated identity.
pub fn issue(user_id: i32, domain: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iss: domain.to_string(),
        aud: domain.to_string(),
        iat: now.timestamp(),
        nbf: now.timestamp(),
        exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature, expiry, issuer, and audience; returns the claims.
pub fn verify(token: &str, domain: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[domain]);
    validation.set_audience(&[domain]);
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";
    const DOMAIN: &str = "coralshop.app";

    #[test]
    fn issue_then_verify_round_trip() {
        let token = issue(42, DOMAIN, SECRET).unwrap();
        let claims = verify(&token, DOMAIN, SECRET).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, DOMAIN);
        assert_eq!(claims.aud, DOMAIN);
        assert_eq!(claims.exp, claims.iat + TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let past = chrono::Utc::now().timestamp() - 7200;
        let claims = Claims {
            sub: "42".into(),
            iss: DOMAIN.into(),
            aud: DOMAIN.into(),
            iat: past,
            nbf: past,
            exp: past + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify(&token, DOMAIN, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(42, DOMAIN, SECRET).unwrap();
        assert!(verify(&token, DOMAIN, "other-secret").is_err());
    }

    #[test]
    fn wrong_domain_is_rejected() {
        let token = issue(42, DOMAIN, SECRET).unwrap();
        assert!(verify(&token, "elsewhere.app", SECRET).is_err());
    }
}
