use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{AuthError, Principal};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated admin context for a request. Extracting it is the
/// authentication gate: handlers for authorization-sensitive mutations
/// take it as an argument, so the gate always completes before the
/// handler body runs. Public endpoints simply never extract it.
#[derive(Clone, Debug)]
pub struct AuthAdmin(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            ApiError::unauthenticated("No token provided. Please login to continue.")
        })?;

        match state.tokens.verify(&token) {
            Ok(principal) => {
                // Make the principal visible to any later middleware too.
                parts.extensions.insert(principal.clone());
                Ok(AuthAdmin(principal))
            }
            Err(AuthError::InvalidToken) => Err(ApiError::unauthenticated(
                "Invalid or expired token. Please login again.",
            )),
            Err(err) => Err(err.into()),
        }
    }
}

/// Extract the bearer credential from the Authorization header. A missing
/// header or a non-Bearer scheme both count as "no token".
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(
            bearer_token(&headers_with(Some("Bearer abc.def.ghi"))),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(bearer_token(&headers_with(None)), None);
        assert_eq!(bearer_token(&headers_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&headers_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&headers_with(Some("bearer abc"))), None);
    }
}
