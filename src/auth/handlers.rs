use crate::{
    auth::{
        jwt::generate_access_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    model::user::{LoginReqDto, RegisterReq, UserSql},
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

/// User registration handler. Email uniqueness rests on the DB unique key,
/// not an application-side check.
pub async fn register(user: web::Json<RegisterReq>, pool: web::Data<MySqlPool>) -> impl Responder {
    let name = user.name.trim();
    let email = user.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || user.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "Name, email and password must not be empty"
        }));
    }

    let hashed = match hash_password(&user.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            }));
        }
    };

    let result = sqlx::query(r#"INSERT INTO users (name, email, password) VALUES (?, ?, ?)"#)
        .bind(name)
        .bind(&email)
        .bind(&hashed)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "User registered successfully"
        })),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return HttpResponse::Conflict().json(json!({
                        "error": "Email already registered"
                    }));
                }
            }

            error!(error = %e, "Failed to register user");
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            }))
        }
    }
}

#[derive(Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[instrument(
    name = "auth_login",
    skip(pool, config, user),
    fields(email = %user.email)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return HttpResponse::BadRequest().body("Email or password required");
    }

    debug!("Fetching user from database");

    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, name, email, password, is_admin
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(user.email.trim().to_lowercase())
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!("Verifying password");

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Generating access token");

    let access_token = match generate_access_token(
        db_user.id,
        db_user.email,
        db_user.name,
        db_user.is_admin,
        &config.jwt_secret,
        config.access_token_ttl,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to sign access token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse { access_token })
}
