use crate::attendance::error::AttendanceError;
use crate::attendance::service::{AttendanceService, ListRequest};
use crate::auth::auth::AuthUser;
use crate::clock;
use crate::model::attendance::{AttendanceAnalytics, EnrichedAttendance, Punctuality};
use crate::store::mysql::MySqlAttendanceStore;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

pub type Service = AttendanceService<MySqlAttendanceStore>;

fn business_error(e: &AttendanceError) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "message": e.to_string() }))
}

/// Punch-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/punch-in",
    responses(
        (status = 200, description = "Punched in successfully", body = EnrichedAttendance),
        (status = 400, description = "Already punched in today", body = Object, example = json!({
            "message": "Already punched in"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch_in(
    auth: AuthUser,
    service: web::Data<Service>,
) -> actix_web::Result<impl Responder> {
    match service.punch_in(auth.user_id, clock::now_local()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(record)),
        Err(e) if e.is_client_error() => Ok(business_error(&e)),
        Err(e) => {
            tracing::error!(error = %e, employee_id = auth.user_id, "Punch-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Punch-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/punch-out",
    responses(
        (status = 200, description = "Punched out successfully", body = EnrichedAttendance),
        (status = 400, description = "No punch-in yet or already punched out", body = Object, example = json!({
            "message": "No punch in record for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch_out(
    auth: AuthUser,
    service: web::Data<Service>,
) -> actix_web::Result<impl Responder> {
    match service.punch_out(auth.user_id, clock::now_local()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(record)),
        Err(e) if e.is_client_error() => Ok(business_error(&e)),
        Err(e) => {
            tracing::error!(error = %e, employee_id = auth.user_id, "Punch-out failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Exact date, `YYYY-MM-DD`; wins over the range below.
    #[param(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date")]
    pub date_from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date")]
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring match on the employee name.
    pub search: Option<String>,
    pub punctuality: Option<Punctuality>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(serde::Serialize, ToSchema)]
pub struct ListResponse {
    pub data: Vec<EnrichedAttendance>,
}

/// Attendance listing with filters and pagination
#[utoipa::path(
    get,
    path = "/api/attendance/list",
    params(ListQuery),
    responses(
        (status = 200, description = "Filtered attendance records", body = ListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list(
    _auth: AuthUser,
    service: web::Data<Service>,
    query: web::Query<ListQuery>,
) -> actix_web::Result<impl Responder> {
    let query = query.into_inner();
    let request = ListRequest {
        date: query.date,
        date_from: query.date_from,
        date_to: query.date_to,
        punctuality: query.punctuality,
        search: query.search,
        page: query.page,
        limit: query.limit,
    };

    let data = service.list(request).await.map_err(|e| {
        tracing::error!(error = %e, "Attendance listing failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ListResponse { data }))
}

/// Daily attendance analytics
#[utoipa::path(
    get,
    path = "/api/attendance/analytics",
    responses(
        (status = 200, description = "Rollup for today", body = AttendanceAnalytics),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn analytics(
    _auth: AuthUser,
    service: web::Data<Service>,
) -> actix_web::Result<impl Responder> {
    let rollup = service.analytics(clock::today()).await.map_err(|e| {
        tracing::error!(error = %e, "Attendance analytics failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rollup))
}
