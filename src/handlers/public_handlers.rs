use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::api::IssueApi;
use crate::auth::session;
use crate::controllers::PublicController;
use crate::errors::{AppError, render};
use crate::templates_structs::{
    FeedAudience, LandingTemplate, LoginState, PageContext, SignupState, render_issue_feed,
};

pub async fn index(
    api: web::Data<dyn IssueApi>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let controller = PublicController::new(api.get_ref());
    render_landing(&controller, &session, LoginState::default(), SignupState::default()).await
}

/// Landing page with the public feed. Auth handlers reuse this to re-show a
/// form after a failed attempt.
pub async fn render_landing(
    controller: &PublicController<'_>,
    session: &Session,
    login: LoginState,
    signup: SignupState,
) -> Result<HttpResponse, AppError> {
    let signed_in = session::get_signed_in(session);
    let ctx = PageContext::build(session, signed_in.as_ref());

    let (issues, load_error) = match controller.load_feed().await {
        Ok(issues) => (issues, false),
        Err(_) => (Vec::new(), true),
    };
    let feed_html = render_issue_feed(&issues, FeedAudience::Public)?;

    render(LandingTemplate { ctx, feed_html, load_error, login, signup })
}
