use crate::api::attendance::ListResponse;
use crate::model::attendance::{AttendanceAnalytics, EnrichedAttendance, Punctuality};
use crate::model::user::UserBrief;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Service API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Service

Tracks daily punch-in/punch-out events, classifies every arrival as
early / on-time / late against the configured business start and grace
window, and exposes attendance listings and daily analytics.

### Key Features
- **Punching**
  - One punch-in and one punch-out per employee per day
- **Punctuality**
  - Arrival classification with a configurable grace window
- **Reporting**
  - Filtered, paginated listings and a daily rollup

### Security
Attendance endpoints require **JWT Bearer authentication**; the token
identifies the punching employee.
"#,
    ),
    paths(
        crate::api::attendance::punch_in,
        crate::api::attendance::punch_out,
        crate::api::attendance::list,
        crate::api::attendance::analytics,
    ),
    components(
        schemas(
            Punctuality,
            EnrichedAttendance,
            AttendanceAnalytics,
            UserBrief,
            ListResponse,
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance tracking APIs"),
    )
)]
pub struct ApiDoc;
