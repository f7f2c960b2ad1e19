use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::auth::session;
use crate::models::user::Role;

/// Guard for the citizen dashboard scope.
pub async fn require_citizen(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    guard(req, next, Role::Citizen).await
}

/// Guard for the admin dashboard scope.
pub async fn require_admin(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    guard(req, next, Role::Admin).await
}

/// Sends the request back to the public landing page unless the session holds
/// a token for a user with `role`. Runs before any handler renders anything.
async fn guard(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
    role: Role,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let allowed = session::has_role(&req.get_session(), role);

    if !allowed {
        log::debug!("Redirecting {} to landing page: no {role} session", req.path());
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", "/"))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
