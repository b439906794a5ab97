//! 请求提取器
//!
//! 认证中间件把 Claims 放进请求扩展，处理器通过这里的提取器拿到 `Actor`

use axum::{extract::FromRequestParts, http::request::Parts};
use eco_core::Actor;

use crate::auth::Claims;
use crate::error::ApiError;

/// 已登录用户，未登录时返回 401
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Actor);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or_else(|| ApiError::unauthorized("未认证"))?;

        Ok(Self(claims.to_actor()?))
    }
}

/// 可选登录用户，用于公开但对登录用户展示更多信息的接口
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Actor>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .extensions
            .get::<Claims>()
            .map(Claims::to_actor)
            .transpose()?;

        Ok(Self(actor))
    }
}

/// 当前请求的 Claims（登出时需要 jti 与过期时间）
#[derive(Debug, Clone)]
pub struct CurrentClaims(pub Claims);

impl<S> FromRequestParts<S> for CurrentClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Self)
            .ok_or_else(|| ApiError::unauthorized("未认证"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn claims(sub: &str, roles: Vec<String>) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "alice".to_string(),
            roles,
            jti: "jti-1".to_string(),
            iat: 0,
            exp: i64::MAX,
            iss: "eco-api".to_string(),
        }
    }

    fn parts_with(claims: Option<Claims>) -> Parts {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(c) = claims {
            request.extensions_mut().insert(c);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_current_user_requires_claims() {
        let mut parts = parts_with(None);
        let err = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_current_user_from_claims() {
        let mut parts = parts_with(Some(claims("42", vec!["moderator".to_string()])));
        let CurrentUser(actor) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(actor.account_id, 42);
        assert!(actor.is_moderator);
    }

    #[tokio::test]
    async fn test_maybe_user() {
        let mut parts = parts_with(None);
        let MaybeUser(actor) = MaybeUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(actor.is_none());

        let mut parts = parts_with(Some(claims("not-a-number", vec![])));
        assert!(MaybeUser::from_request_parts(&mut parts, &()).await.is_err());
    }
}
