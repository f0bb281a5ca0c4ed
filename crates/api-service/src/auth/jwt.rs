//! JWT Token 处理
//!
//! Token 载荷携带用户的套餐等级，数据接口据此决定行数上限。

use chrono::{Duration, Utc};
use datagen_pipeline::PlanTier;
use datagen_shared::config::AuthConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 签名密钥
    pub secret: String,
    /// Token 过期时间（秒）
    pub expires_in_secs: i64,
    /// Token 签发者
    pub issuer: String,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expires_in_secs: i64::try_from(config.jwt_expires_secs).unwrap_or(i64::MAX),
            issuer: config.issuer.clone(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    pub username: String,
    /// 套餐等级，缺省视为 free
    #[serde(default)]
    pub plan: PlanTier,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT Token（HS256），返回 token 与过期时间戳
    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        plan: PlanTier,
    ) -> Result<(String, i64), ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.expires_in_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            plan,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析 JWT Token
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("Token 已过期".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    ApiError::Unauthorized("无效的 Token".to_string())
                }
                _ => ApiError::Unauthorized(format!("Token 验证失败: {}", e)),
            },
        )?;

        Ok(token_data.claims)
    }

    pub fn expires_in_secs(&self) -> i64 {
        self.config.expires_in_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            expires_in_secs: 7200,
            issuer: "datagen".to_string(),
        })
    }

    #[test]
    fn test_generate_and_verify() {
        let jwt = manager();
        let (token, exp) = jwt.generate_token(42, "alice", PlanTier::Paid).unwrap();

        let claims = jwt.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.plan, PlanTier::Paid);
        assert_eq!(claims.iss, "datagen");
        assert_eq!(claims.exp, exp);
        assert_eq!(claims.exp - claims.iat, 7200);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = manager().generate_token(1, "bob", PlanTier::Free).unwrap();

        let other = JwtManager::new(JwtConfig {
            secret: "other-secret".to_string(),
            ..JwtConfig::default()
        });
        assert!(matches!(
            other.verify_token(&token),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            expires_in_secs: -3600,
            issuer: "datagen".to_string(),
        });
        let (token, _) = jwt.generate_token(1, "bob", PlanTier::Free).unwrap();
        assert!(jwt.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(manager().verify_token("not.a.token").is_err());
    }

    #[test]
    fn test_default_expiry_is_two_hours() {
        assert_eq!(JwtConfig::default().expires_in_secs, 7200);
    }
}
