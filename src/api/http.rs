use actix_web::web::Bytes;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{ApiError, ApiMessage, IssueApi};
use crate::models::issue::{Issue, IssueStatus, NewReport};
use crate::models::user::{AuthResponse, LoginForm, SignupForm};

/// reqwest-backed [`IssueApi`]. Cloning shares the connection pool.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Self {
        HttpApi {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `<base>/issues/<id>/<tail…>` with the id percent-encoded as one segment.
    fn issue_url(&self, id: &str, tail: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Transport(format!("invalid API base URL: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Transport("API base URL cannot take a path".to_string()))?;
            segments.pop_if_empty().push("issues").push(id).extend(tail);
        }
        Ok(url)
    }

    /// Sends the request and returns the body of a 2xx response, or turns the
    /// response into an [`ApiError::Rejected`] carrying the server message.
    async fn execute(&self, req: RequestBuilder) -> Result<Bytes, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            let message = serde_json::from_slice::<ApiMessage>(&body)
                .ok()
                .and_then(|m| m.message);
            log::debug!("API responded {status}: {message:?}");
            Err(ApiError::Rejected { status: status.as_u16(), message })
        }
    }

    /// Reads: the body must decode as `T`.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(req).await?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Transport(format!("invalid response body: {e}")))
    }

    /// Mutations: the status alone decides success.
    async fn send_mutation(&self, req: RequestBuilder) -> Result<Option<Issue>, ApiError> {
        let body = self.execute(req).await?;
        match serde_json::from_slice::<Issue>(&body) {
            Ok(issue) => Ok(Some(issue)),
            Err(e) => {
                log::debug!("Mutation accepted without a readable issue body: {e}");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl IssueApi for HttpApi {
    async fn login(&self, form: &LoginForm) -> Result<AuthResponse, ApiError> {
        let req = self.client.post(self.url("/auth/login")).json(form);
        self.send(req).await
    }

    async fn register(&self, form: &SignupForm) -> Result<AuthResponse, ApiError> {
        let req = self.client.post(self.url("/auth/register")).json(form);
        self.send(req).await
    }

    async fn public_issues(&self) -> Result<Vec<Issue>, ApiError> {
        let req = self.client.get(self.url("/issues/public"));
        self.send(req).await
    }

    async fn my_issues(&self, token: &str) -> Result<Vec<Issue>, ApiError> {
        let req = self.client.get(self.url("/issues/my-issues")).bearer_auth(token);
        self.send(req).await
    }

    async fn all_issues(&self, token: &str) -> Result<Vec<Issue>, ApiError> {
        let req = self.client.get(self.url("/issues/admin/all")).bearer_auth(token);
        self.send(req).await
    }

    async fn issue(&self, id: &str) -> Result<Issue, ApiError> {
        let req = self.client.get(self.issue_url(id, &[])?);
        self.send(req).await
    }

    async fn update_status(
        &self,
        token: &str,
        id: &str,
        status: IssueStatus,
    ) -> Result<Option<Issue>, ApiError> {
        let req = self
            .client
            .patch(self.issue_url(id, &["status"])?)
            .bearer_auth(token)
            .json(&json!({ "status": status }));
        self.send_mutation(req).await
    }

    async fn report_issue(
        &self,
        token: &str,
        report: NewReport,
    ) -> Result<Option<Issue>, ApiError> {
        let image = Part::bytes(report.image.bytes)
            .file_name(report.image.file_name)
            .mime_str(&report.image.content_type)
            .map_err(|e| ApiError::Transport(format!("invalid image type: {e}")))?;

        let form = Form::new()
            .text("title", report.title)
            .text("description", report.description)
            .text("category", report.category)
            .text("latitude", report.location.latitude.to_string())
            .text("longitude", report.location.longitude.to_string())
            .part("image", image);

        let req = self
            .client
            .post(self.url("/issues/report"))
            .bearer_auth(token)
            .multipart(form);
        self.send_mutation(req).await
    }
}
