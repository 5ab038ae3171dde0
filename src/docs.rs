use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::admin::model::UserWithRole;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::grades::model::{GradeResponse, TranscriptResponse};
use crate::modules::me::controller::MeResponse;
use crate::modules::students::model::GpaSummary;
use kampus_models::{
    EnrollmentStatus, EnrollmentView, Notice, NoticeLevel, RecordGradeDto, Role, TeacherGroup,
    User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::me::controller::get_me,
        crate::modules::students::controller::get_my_enrollments,
        crate::modules::students::controller::get_my_gpa,
        crate::modules::teachers::controller::get_my_groups,
        crate::modules::grades::controller::record_grade,
        crate::modules::grades::controller::get_transcript,
        crate::modules::admin::controller::list_users,
        crate::modules::notices::controller::get_notices,
    ),
    components(
        schemas(
            User,
            Role,
            LoginRequest,
            LoginResponse,
            MeResponse,
            EnrollmentStatus,
            EnrollmentView,
            GpaSummary,
            TeacherGroup,
            RecordGradeDto,
            GradeResponse,
            TranscriptResponse,
            UserWithRole,
            Notice,
            NoticeLevel,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login"),
        (name = "Me", description = "Role of the calling request"),
        (name = "Students", description = "Student self-service, students only"),
        (name = "Teachers", description = "Teacher self-service, teachers only"),
        (name = "Grades", description = "Grading and transcripts, teachers and admins"),
        (name = "Admin", description = "Administration, admins only"),
        (name = "Notices", description = "Queued user notices")
    ),
    info(
        title = "Kampus API",
        version = "0.1.0",
        description = "School management API with role-based access for students, teachers and administrators.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
