use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::IssueApi;
use crate::auth::{csrf, session};
use crate::controllers::PublicController;
use crate::controllers::public::{LOGIN_FAILED, REGISTRATION_FAILED};
use crate::errors::{AppError, redirect};
use crate::handlers::public_handlers::render_landing;
use crate::models::user::{LoginForm, Role, SignupForm};
use crate::templates_structs::{LoginState, SignupState};

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_submit(
    api: web::Data<dyn IssueApi>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;
    let form = form.into_inner();
    let controller = PublicController::new(api.get_ref());

    match controller.login(&form).await {
        Ok(auth) => {
            session::store_signed_in(&session, &auth)?;
            Ok(redirect(auth.user.role.home_path()))
        }
        Err(e) => {
            let login = LoginState {
                open: true,
                email: form.email,
                error: Some(e.user_message(LOGIN_FAILED)),
            };
            render_landing(&controller, &session, login, SignupState::default()).await
        }
    }
}

pub async fn signup_submit(
    api: web::Data<dyn IssueApi>,
    session: Session,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;
    let form = form.into_inner();
    let controller = PublicController::new(api.get_ref());

    match controller.signup(&form).await {
        Ok(auth) => {
            session::store_signed_in(&session, &auth)?;
            Ok(redirect(auth.user.role.home_path()))
        }
        Err(e) => {
            let signup = SignupState {
                open: true,
                name: form.name,
                email: form.email,
                admin_selected: form.role == Role::Admin,
                error: Some(e.user_message(REGISTRATION_FAILED)),
            };
            render_landing(&controller, &session, LoginState::default(), signup).await
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;
    session.purge();
    Ok(redirect("/"))
}
