//! Role resolution and role-based route gates.
//!
//! Every request is resolved to a [`Role`] by [`resolve_role`]:
//!
//! - no authenticated principal: [`Role::Anonymous`]
//! - a profile is attached: the profile's `user_type`
//! - no profile, staff account: [`Role::Admin`]
//! - otherwise: [`Role::Unknown`]
//!
//! Resolution never fails. If the profile cannot be read the error is logged
//! and the request is treated as [`Role::Unknown`]. The staff flag comes from
//! the stored account, never from the access token (see
//! [`resolve_current_user`]).
//!
//! [`annotate_role`] runs on every request and stores the result as
//! [`RequestRole`] and [`CurrentUser`] extensions. The gates
//! ([`require_student`], [`require_teacher`], [`require_admin`],
//! [`require_teacher_or_admin`]) resolve again through the same function and
//! do not trust the cached value.
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/me/gpa", get(get_gpa))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_student));
//! ```

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use kampus_core::AppError;
use kampus_db::Directory;
use kampus_models::{CurrentUser, NoticeLevel, Principal, Role};
use kampus_observability::security_event;
use tracing::{debug, warn};

use crate::middleware::auth::authenticate;
use crate::state::AppState;

/// Role resolved for the current request by [`annotate_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRole(pub Role);

/// Resolve the role of `principal`.
pub async fn resolve_role(directory: &dyn Directory, principal: Option<&Principal>) -> Role {
    let Some(principal) = principal else {
        return Role::Anonymous;
    };

    match directory.find_profile(principal.user_id).await {
        Ok(profile) => Role::from_profile(principal.is_staff, profile.map(|p| p.user_type)),
        Err(e) => {
            warn!(
                user_id = %principal.user_id,
                error = %e,
                "Failed to read user profile, resolving role as unknown"
            );
            Role::Unknown
        }
    }
}

/// Authenticate the request and resolve its role against the stored account.
///
/// The token only names the user: the staff flag and the active state are read
/// from the directory on every call. A missing or deactivated account is
/// anonymous. If the account cannot be read, the token's identity is kept
/// without the staff flag and the role is [`Role::Unknown`].
///
/// Fails only when a bearer token is present but invalid.
pub async fn resolve_current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<CurrentUser, AppError> {
    let Some(claimed) = authenticate(headers, &state.jwt_config)? else {
        return Ok(CurrentUser::anonymous());
    };
    let directory = state.directory.as_ref();

    match directory.find_user(claimed.user_id).await {
        Ok(Some(user)) if user.is_active => {
            let principal = user.principal();
            let role = resolve_role(directory, Some(&principal)).await;
            Ok(CurrentUser {
                principal: Some(principal),
                role,
            })
        }
        Ok(_) => {
            debug!(
                user_id = %claimed.user_id,
                "Token subject is missing or inactive, treating request as anonymous"
            );
            Ok(CurrentUser::anonymous())
        }
        Err(e) => {
            warn!(
                user_id = %claimed.user_id,
                error = %e,
                "Failed to load user account, resolving role as unknown"
            );
            Ok(CurrentUser {
                principal: Some(Principal {
                    is_staff: false,
                    ..claimed
                }),
                role: Role::Unknown,
            })
        }
    }
}

/// Attach [`RequestRole`] and [`CurrentUser`] to every request.
///
/// Never rejects: an invalid token makes the request anonymous.
pub async fn annotate_role(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let current = match resolve_current_user(&state, req.headers()).await {
        Ok(current) => current,
        Err(e) => {
            debug!(error = %e.error, "Ignoring invalid bearer token");
            CurrentUser::anonymous()
        }
    };

    req.extensions_mut().insert(RequestRole(current.role));
    req.extensions_mut().insert(current);
    next.run(req).await
}

/// A set of roles allowed through a route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    name: &'static str,
    allowed: &'static [Role],
    /// Staff accounts pass regardless of their resolved role.
    staff_passes: bool,
    denial: &'static str,
}

impl RoleGate {
    pub const STUDENT_ONLY: RoleGate = RoleGate {
        name: "student_only",
        allowed: &[Role::Student],
        staff_passes: false,
        denial: "Only students can access this page.",
    };

    pub const TEACHER_ONLY: RoleGate = RoleGate {
        name: "teacher_only",
        allowed: &[Role::Teacher],
        staff_passes: false,
        denial: "Only teachers can access this page.",
    };

    pub const ADMIN_ONLY: RoleGate = RoleGate {
        name: "admin_only",
        allowed: &[Role::Admin],
        staff_passes: true,
        denial: "Only administrators can access this page.",
    };

    pub const TEACHER_OR_ADMIN: RoleGate = RoleGate {
        name: "teacher_or_admin",
        allowed: &[Role::Teacher, Role::Admin],
        staff_passes: true,
        denial: "Only teachers or administrators can access this page.",
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Message returned to, and queued for, a rejected user.
    pub fn denial_message(&self) -> &'static str {
        self.denial
    }

    pub fn permits(&self, current: &CurrentUser) -> bool {
        (self.staff_passes && current.is_staff()) || self.allowed.contains(&current.role)
    }
}

/// Run `gate` for the request.
///
/// Anonymous requests get 401. Authenticated users outside the gate get 403
/// and an error notice queued on their notice board.
pub async fn require_gate(
    gate: RoleGate,
    state: &AppState,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current = resolve_current_user(state, req.headers()).await?;

    let Some(user_id) = current.user_id() else {
        return Err(AppError::unauthorized("Authentication required".to_string()));
    };

    if !gate.permits(&current) {
        security_event!(
            "access_denied",
            user = %current.identity(),
            role = %current.role,
            gate = gate.name(),
            path = %req.uri().path()
        );
        let pending = state
            .notices
            .push(user_id, NoticeLevel::Error, gate.denial_message())
            .await;
        debug!(user_id = %user_id, pending, "Queued denial notice");
        return Err(AppError::forbidden(gate.denial_message().to_string()));
    }

    req.extensions_mut().insert(RequestRole(current.role));
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

async fn run_gate(gate: RoleGate, state: AppState, req: Request, next: Next) -> Response {
    match require_gate(gate, &state, req, next).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Route layer admitting students only.
pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    run_gate(RoleGate::STUDENT_ONLY, state, req, next).await
}

/// Route layer admitting teachers only.
pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    run_gate(RoleGate::TEACHER_ONLY, state, req, next).await
}

/// Route layer admitting admins and staff accounts.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    run_gate(RoleGate::ADMIN_ONLY, state, req, next).await
}

/// Route layer admitting teachers, admins and staff accounts.
pub async fn require_teacher_or_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    run_gate(RoleGate::TEACHER_OR_ADMIN, state, req, next).await
}
