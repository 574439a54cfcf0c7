//! Login request and response bodies

use serde::{Deserialize, Serialize};

/// Body of `POST auth/login/`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response; the token is either top-level or inside the `data` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Flat { token: String },
    Wrapped { data: LoginData },
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
}

impl LoginResponse {
    pub fn into_token(self) -> String {
        match self {
            LoginResponse::Flat { token } => token,
            LoginResponse::Wrapped { data } => data.token,
        }
    }
}
