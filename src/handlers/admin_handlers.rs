use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::IssueApi;
use crate::auth::session::{self, Flash};
use crate::auth::csrf;
use crate::controllers::admin::{STATUS_UPDATED, STATUS_UPDATE_FAILED};
use crate::controllers::{AdminController, DETAIL_FAILED, StatusChange, fetch_issue_detail};
use crate::errors::{AppError, redirect, render};
use crate::models::issue::{IssueFilter, IssueStatus};
use crate::models::user::Role;
use crate::templates_structs::{
    AdminDashboardTemplate, FeedAudience, IssueDetailTemplate, IssueDetailView, PageContext,
    StatusForm, category_filter_options, render_issue_feed, status_filter_options,
};

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Posted by both the inline card selector and the detail view.
#[derive(Deserialize)]
pub struct StatusUpdateForm {
    pub csrf_token: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub status_filter: String,
    #[serde(default)]
    pub category_filter: String,
}

impl StatusUpdateForm {
    /// Blank means nothing was picked.
    fn new_status(&self) -> Result<Option<IssueStatus>, AppError> {
        let value = self.status.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some).map_err(AppError::BadRequest)
    }
}

/// `/admin`, keeping an active filter in the query string.
fn dashboard_path(filter: &IssueFilter) -> String {
    if filter.is_empty() {
        return "/admin".to_string();
    }
    let query = serde_urlencoded::to_string(&[
        ("status", filter.status_value()),
        ("category", filter.category_value()),
    ][..])
    .unwrap_or_default();
    format!("/admin?{query}")
}

pub async fn dashboard(
    api: web::Data<dyn IssueApi>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let signed_in = session::require_role(&session, Role::Admin)?;
    let mut controller = AdminController::new(api.get_ref(), &signed_in.token);
    let _ = controller.refresh().await;
    controller.apply_filter(IssueFilter::from_query(
        query.status.as_deref(),
        query.category.as_deref(),
    ));

    let ctx = PageContext::build(&session, Some(&signed_in));
    render_dashboard(ctx, &controller)
}

fn render_dashboard(ctx: PageContext, controller: &AdminController<'_>) -> Result<HttpResponse, AppError> {
    let feed_html = render_issue_feed(
        controller.filtered_issues(),
        FeedAudience::Admin { csrf_token: &ctx.csrf_token, filter: controller.filter() },
    )?;
    render(AdminDashboardTemplate {
        stats: controller.stats(),
        feed_html,
        load_error: controller.load_failed(),
        status_options: status_filter_options(controller.filter()),
        category_options: category_filter_options(controller.filter()),
        ctx,
    })
}

pub async fn update_status(
    api: web::Data<dyn IssueApi>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<StatusUpdateForm>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;
    let signed_in = session::require_role(&session, Role::Admin)?;
    let issue_id = path.into_inner();
    let new_status = form.new_status()?;

    let mut controller = AdminController::new(api.get_ref(), &signed_in.token);
    controller.apply_filter(IssueFilter::from_query(
        Some(&form.status_filter),
        Some(&form.category_filter),
    ));
    let back = dashboard_path(controller.filter());

    match controller.update_status(&issue_id, new_status).await {
        Ok(StatusChange::Skipped) => Ok(redirect(&back)),
        Ok(StatusChange::Applied(_)) => {
            log::debug!("Status change for {issue_id} came from the {} view", form.origin);
            // Back to the dashboard either way; a change from the detail view
            // closes it.
            session::set_flash(&session, Flash::success(STATUS_UPDATED));
            Ok(redirect(&back))
        }
        Err(e) => {
            session::set_flash(&session, Flash::error(e.user_message(STATUS_UPDATE_FAILED)));
            Ok(redirect(&back))
        }
    }
}

pub async fn issue_detail(
    api: web::Data<dyn IssueApi>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let signed_in = session::require_role(&session, Role::Admin)?;
    let issue_id = path.into_inner();

    match fetch_issue_detail(api.get_ref(), &issue_id).await {
        Ok(issue) => {
            let ctx = PageContext::build(&session, Some(&signed_in));
            let status_form = Some(StatusForm::detail(&issue, &ctx.csrf_token));
            render(IssueDetailTemplate {
                ctx,
                issue: IssueDetailView::new(&issue, true),
                back_href: "/admin",
                status_form,
            })
        }
        Err(e) => {
            session::set_flash(&session, Flash::error(e.user_message(DETAIL_FAILED)));
            Ok(redirect("/admin"))
        }
    }
}
