//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能。每个 Token 带唯一的 jti，登出时按 jti 吊销。

use chrono::{Duration, Utc};
use eco_core::Actor;
use eco_shared::config::AuthConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// 审核员角色名
pub const MODERATOR_ROLE: &str = "moderator";

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
            expires_in_secs: config.jwt_expires_secs,
            issuer: config.jwt_issuer.clone(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 账户 ID
    pub sub: String,
    pub username: String,
    /// 角色列表，审核员为 ["moderator"]
    pub roles: Vec<String>,
    /// Token 唯一标识，用于吊销
    pub jti: String,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

impl Claims {
    pub fn is_moderator(&self) -> bool {
        self.roles.iter().any(|r| r == MODERATOR_ROLE)
    }

    /// 距离过期的剩余秒数（已过期返回 0）
    pub fn remaining_secs(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(0) as u64
    }

    /// 转换为服务层的请求发起者
    pub fn to_actor(&self) -> Result<Actor, ApiError> {
        let account_id: i64 = self
            .sub
            .parse()
            .map_err(|_| ApiError::unauthorized("无效的用户 ID"))?;

        Ok(Actor::new(account_id, self.username.clone(), self.is_moderator()))
    }
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// 创建 JWT 管理器
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT Token，返回 (token, 过期时间戳)
    pub fn generate_token(
        &self,
        account_id: i64,
        username: &str,
        is_moderator: bool,
    ) -> Result<(String, i64), ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.expires_in_secs);

        let roles = if is_moderator {
            vec![MODERATOR_ROLE.to_string()]
        } else {
            Vec::new()
        };

        let claims = Claims {
            sub: account_id.to_string(),
            username: username.to_string(),
            roles,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析 JWT Token
    ///
    /// 只校验签名、过期和签发者；吊销检查由认证中间件完成
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::unauthorized("Token 已过期")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    ApiError::unauthorized("无效的 Token")
                }
                _ => ApiError::unauthorized(format!("Token 验证失败: {}", e)),
            },
        )?;

        Ok(token_data.claims)
    }

    /// 获取 Token 过期时间（秒）
    pub fn expires_in_secs(&self) -> i64 {
        self.config.expires_in_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let manager = JwtManager::new(JwtConfig::default());

        let (token, exp) = manager.generate_token(42, "alice", false).unwrap();
        let claims = manager.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, exp);
        assert!(!claims.is_moderator());
        assert!(claims.remaining_secs() > 0);

        let actor = claims.to_actor().unwrap();
        assert_eq!(actor.account_id, 42);
        assert!(!actor.is_moderator);
    }

    #[test]
    fn test_moderator_role_and_unique_jti() {
        let manager = JwtManager::new(JwtConfig::default());

        let (a, _) = manager.generate_token(1, "mod", true).unwrap();
        let (b, _) = manager.generate_token(1, "mod", true).unwrap();
        let a = manager.verify_token(&a).unwrap();
        let b = manager.verify_token(&b).unwrap();

        assert!(a.is_moderator());
        assert_eq!(a.roles, vec![MODERATOR_ROLE]);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new(JwtConfig::default());
        assert!(manager.verify_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_or_issuer_rejected() {
        let manager = JwtManager::new(JwtConfig::default());
        let (token, _) = manager.generate_token(1, "alice", false).unwrap();

        let other_secret = JwtManager::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });
        assert!(other_secret.verify_token(&token).is_err());

        let other_issuer = JwtManager::new(JwtConfig {
            issuer: "someone-else".to_string(),
            ..JwtConfig::default()
        });
        assert!(other_issuer.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new(JwtConfig {
            expires_in_secs: -120,
            ..JwtConfig::default()
        });
        let (token, _) = manager.generate_token(1, "alice", false).unwrap();

        let err = manager.verify_token(&token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
