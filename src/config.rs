//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Symmetric secret for signing bearer tokens
    pub jwt_secret: String,
    /// Issuer/audience domain stamped into every token
    pub token_domain: String,
    /// Directory the image store writes uploads into
    pub image_dir: String,
    /// Environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            token_domain: std::env::var("TOKEN_DOMAIN")
                .unwrap_or_else(|_| "coralshop.app".into()),
            image_dir: std::env::var("IMAGE_DIR").unwrap_or_else(|_| "img".into()),
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_secret_falls_back_in_development() {
        let val = Config::require_secret("CORAL_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-CORAL_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn require_secret_fails_in_production() {
        let err = Config::require_secret("CORAL_TEST_UNSET_SECRET", "production").unwrap_err();
        assert!(err.to_string().contains("must be set"));
    }
}
