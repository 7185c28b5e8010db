//! Authentication endpoints (`/auth/*`).

use serde_json::json;

use crate::net::transport::ApiRequest;
use crate::net::types::LoginRequest;

pub const CAPTCHA_PATH: &str = "/auth/captcha";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const ME_PATH: &str = "/auth/me";

#[must_use]
pub fn captcha() -> ApiRequest {
    ApiRequest::get(CAPTCHA_PATH)
}

#[must_use]
pub fn login(credentials: &LoginRequest) -> ApiRequest {
    ApiRequest::post(LOGIN_PATH).json(json!({
        "username": credentials.username,
        "password": credentials.password,
        "captcha_id": credentials.captcha_id,
        "captcha_code": credentials.captcha_code,
        "remember": credentials.remember,
    }))
}

/// Best-effort server-side logout; quiet so a failure never surfaces.
#[must_use]
pub fn logout() -> ApiRequest {
    ApiRequest::post(LOGOUT_PATH).quiet()
}

#[must_use]
pub fn me() -> ApiRequest {
    ApiRequest::get(ME_PATH)
}
