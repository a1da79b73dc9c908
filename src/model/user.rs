use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    pub email: String,
    pub password: String,
}

#[derive(sqlx::FromRow)]
pub struct UserSql {
    pub id: u64, // matches BIGINT UNSIGNED
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Minimal employee identity joined onto attendance records for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UserBrief {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Alice Employee")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Subject: the user's email.
    pub sub: String,
    pub name: String,
    pub is_admin: bool,
    pub exp: usize,
    pub jti: String,
}
