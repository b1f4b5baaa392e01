use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Gate in front of report generation: one configured credential pair,
/// stateless HS256 tokens.
#[derive(Clone)]
pub struct AuthService {
    username: String,
    password: String,
    jwt_secret: String,
    jwt_expires_in_hours: i64,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            username: config.login_username.clone(),
            password: config.login_password.clone(),
            jwt_secret: config.jwt_secret.clone(),
            jwt_expires_in_hours: config.jwt_expires_in_hours,
        }
    }

    #[instrument(name = "auth.login", skip(self, input), fields(username = %input.username))]
    pub fn login(&self, input: &LoginInput) -> AppResult<IssuedToken> {
        let user_ok = input.username.trim() == self.username;
        let password_ok = input.password == self.password;
        if !(user_ok && password_ok) {
            tracing::warn!("Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let issued = self.issue_token(&self.username, Utc::now())?;
        tracing::info!(expires_at = %issued.expires_at, "Login accepted");
        Ok(issued)
    }

    #[instrument(name = "auth.validate_token", skip(self, token))]
    pub fn validate_token(&self, token: &str) -> AppResult<String> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims.sub)
    }

    fn issue_token(&self, subject: &str, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        let expires_at = now + Duration::hours(self.jwt_expires_in_hours);

        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(IssuedToken { token, expires_at })
    }
}

#[cfg(test)]
pub(crate) fn test_auth() -> AuthService {
    AuthService {
        username: "astro".to_string(),
        password: "cosmic".to_string(),
        jwt_secret: "test-secret-key-for-jwt".to_string(),
        jwt_expires_in_hours: 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_issues_valid_token() {
        let auth = test_auth();
        let issued = auth.login(&input("astro", "cosmic")).unwrap();

        assert_eq!(auth.validate_token(&issued.token).unwrap(), "astro");
        let hours = (issued.expires_at - Utc::now()).num_minutes() as f64 / 60.0;
        assert!((11.9..=12.0).contains(&hours));
    }

    #[test]
    fn test_wrong_credentials_rejected() {
        let auth = test_auth();
        for (user, pass) in [("astro", "wrong"), ("someone", "cosmic"), ("", "")] {
            let err = auth.login(&input(user, pass)).unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = test_auth();
        let issued = auth
            .issue_token("astro", Utc::now() - Duration::hours(13))
            .unwrap();
        assert!(matches!(
            auth.validate_token(&issued.token),
            Err(AppError::Jwt(_))
        ));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AuthService {
            jwt_secret: "wrong-secret".to_string(),
            ..test_auth()
        };
        let issued = other.login(&input("astro", "cosmic")).unwrap();
        assert!(test_auth().validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_claims_serialization() {
        let claims = Claims {
            sub: "astro".to_string(),
            exp: 1_700_003_600,
            iat: 1_700_000_000,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "astro");
        assert_eq!(json["exp"], 1_700_003_600);
    }
}
