use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::LoginAttempt;
use crate::account::models::LoginMode;
use crate::account::models::Profile;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let mode = if body.is_admin {
        LoginMode::Admin
    } else {
        LoginMode::User
    };

    state
        .authenticator
        .authenticate(LoginAttempt::new(body.identifier, body.password, mode))
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

/// HTTP request body for a login attempt (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    identifier: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub success: bool,
    pub user: ProfileData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&Profile> for LoginResponseData {
    fn from(profile: &Profile) -> Self {
        Self {
            success: true,
            user: ProfileData {
                id: profile.id.to_string(),
                name: profile.name.clone(),
                email: profile.email.as_str().to_string(),
                is_admin: profile.is_admin,
            },
        }
    }
}
