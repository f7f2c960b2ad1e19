use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde::Deserialize;

use crate::api::IssueApi;
use crate::auth::session::{self, Flash, SavedReport};
use crate::auth::csrf;
use crate::controllers::citizen::{LOCATION_FAILED, REPORT_SUCCEEDED};
use crate::controllers::{CitizenController, DETAIL_FAILED, LocationReading, fetch_issue_detail};
use crate::errors::{AppError, redirect, render};
use crate::models::issue::{ImageUpload, IssueFilter, ReportDraft};
use crate::models::user::Role;
use crate::templates_structs::{
    CitizenDashboardTemplate, FeedAudience, IssueDetailTemplate, IssueDetailView, PageContext,
    ReportFormState, category_filter_options, location_status, render_issue_feed,
    status_filter_options,
};

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Geolocation result posted by the browser: coordinates on success, an
/// error text otherwise.
#[derive(Deserialize)]
pub struct LocationForm {
    pub csrf_token: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub error: String,
}

impl LocationForm {
    fn reading(&self) -> LocationReading {
        if !self.error.trim().is_empty() {
            return LocationReading::Failed(self.error.trim().to_string());
        }
        match (self.latitude.trim().parse(), self.longitude.trim().parse()) {
            (Ok(latitude), Ok(longitude)) => LocationReading::Fix { latitude, longitude },
            _ => LocationReading::Failed("no coordinates in reading".to_string()),
        }
    }
}

pub async fn dashboard(
    api: web::Data<dyn IssueApi>,
    session: Session,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let signed_in = session::require_role(&session, Role::Citizen)?;
    let mut controller =
        CitizenController::new(api.get_ref(), &signed_in.token, session::get_location(&session));
    controller.set_filter(IssueFilter::from_query(
        query.status.as_deref(),
        query.category.as_deref(),
    ));
    let _ = controller.refresh().await;

    let report = match session::take_report_draft(&session) {
        Some(saved) => ReportFormState::retry(&saved.title, &saved.description, &saved.category, saved.error),
        None => ReportFormState::closed(),
    };
    let ctx = PageContext::build(&session, Some(&signed_in));
    render_dashboard(ctx, &controller, report)
}

fn render_dashboard(
    ctx: PageContext,
    controller: &CitizenController<'_>,
    report: ReportFormState,
) -> Result<HttpResponse, AppError> {
    let feed_html = render_issue_feed(&controller.visible_issues(), FeedAudience::Citizen)?;
    render(CitizenDashboardTemplate {
        ctx,
        stats: controller.stats(),
        feed_html,
        load_error: controller.load_failed(),
        status_options: status_filter_options(controller.filter()),
        category_options: category_filter_options(controller.filter()),
        report,
        location_status: location_status(controller.location()),
    })
}

pub async fn capture_location(
    api: web::Data<dyn IssueApi>,
    session: Session,
    form: web::Form<LocationForm>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;
    let signed_in = session::require_role(&session, Role::Citizen)?;
    let mut controller =
        CitizenController::new(api.get_ref(), &signed_in.token, session::get_location(&session));

    let captured = controller.capture_location(form.reading());
    session::set_location(&session, captured);
    if captured.is_none() {
        session::set_flash(&session, Flash::error(LOCATION_FAILED));
    }
    Ok(redirect("/citizen#reportModal"))
}

/// Multipart body of the report form.
struct ReportUpload {
    csrf_token: String,
    draft: ReportDraft,
}

async fn read_report_upload(payload: &mut Multipart) -> Result<ReportUpload, AppError> {
    let mut upload = ReportUpload { csrf_token: String::new(), draft: ReportDraft::default() };

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(String::from);
        let content_type = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk?);
            if bytes.len() > MAX_IMAGE_BYTES {
                return Err(AppError::BadRequest("Upload is too large".to_string()));
            }
        }

        match name.as_str() {
            "csrf_token" => upload.csrf_token = field_text(bytes)?,
            "title" => upload.draft.title = field_text(bytes)?,
            "description" => upload.draft.description = field_text(bytes)?,
            "category" => upload.draft.category = field_text(bytes)?,
            // An empty file input still sends a part with no content.
            "image" if !bytes.is_empty() => {
                upload.draft.image = Some(ImageUpload {
                    file_name: file_name.unwrap_or_else(|| "upload".to_string()),
                    content_type: content_type
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                    bytes,
                });
            }
            "image" => {}
            other => log::debug!("Ignoring report field {other}"),
        }
    }
    Ok(upload)
}

fn field_text(bytes: Vec<u8>) -> Result<String, AppError> {
    String::from_utf8(bytes).map_err(|_| AppError::BadRequest("Form field is not valid UTF-8".to_string()))
}

pub async fn submit_report(
    api: web::Data<dyn IssueApi>,
    session: Session,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_report_upload(&mut payload).await?;
    csrf::verify(&session, &upload.csrf_token)?;
    let signed_in = session::require_role(&session, Role::Citizen)?;
    let mut controller =
        CitizenController::new(api.get_ref(), &signed_in.token, session::get_location(&session));

    let draft = upload.draft;
    let (title, description, category) =
        (draft.title.clone(), draft.description.clone(), draft.category.clone());

    match controller.submit_report(draft).await {
        Ok(_) => {
            session::set_location(&session, controller.location());
            session::set_flash(&session, Flash::success(REPORT_SUCCEEDED));
            Ok(redirect("/citizen"))
        }
        Err(e) => {
            log::warn!("Report not submitted: {e}");
            let saved = SavedReport::new(&title, &description, &category, &e.user_message());
            session::save_report_draft(&session, &saved);
            Ok(redirect("/citizen#reportModal"))
        }
    }
}

pub async fn issue_detail(
    api: web::Data<dyn IssueApi>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let signed_in = session::require_role(&session, Role::Citizen)?;
    let issue_id = path.into_inner();

    match fetch_issue_detail(api.get_ref(), &issue_id).await {
        Ok(issue) => {
            let ctx = PageContext::build(&session, Some(&signed_in));
            render(IssueDetailTemplate {
                ctx,
                issue: IssueDetailView::new(&issue, false),
                back_href: "/citizen",
                status_form: None,
            })
        }
        Err(e) => {
            session::set_flash(&session, Flash::error(e.user_message(DETAIL_FAILED)));
            Ok(redirect("/citizen"))
        }
    }
}
