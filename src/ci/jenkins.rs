//! Jenkins implementation of [`CiTrigger`]

use super::{CiTarget, CiTrigger};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Crumb {
    crumb: String,
    crumb_request_field: String,
}

/// Jenkins remote-build trigger using reqwest
///
/// The client keeps cookies: Jenkins binds a crumb to the session that
/// issued it, so the build request must carry the crumb response's cookie.
#[derive(Debug, Clone)]
pub struct JenkinsTrigger {
    client: Client,
}

impl JenkinsTrigger {
    /// Create a new trigger with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new trigger with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("branchflow")
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Ci(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn authorize(target: &CiTarget, request: RequestBuilder) -> RequestBuilder {
        match &target.auth {
            Some(auth) => request.basic_auth(&auth.user, Some(&auth.token)),
            None => request,
        }
    }

    async fn fetch_crumb(&self, target: &CiTarget) -> Result<Crumb> {
        let url = crumb_url(&target.url)?;
        debug!(%url, "Fetching CI crumb");

        let response = Self::authorize(target, self.client.get(url))
            .send()
            .await
            .map_err(|e| Error::Ci(format!("failed to fetch crumb: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Ci(format!("crumb request returned HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Ci(format!("failed to parse crumb: {e}")))
    }
}

/// `<base>/job/<a>/job/<b>/build[WithParameters]`
pub(super) fn build_url(base: &str, job: &str, with_parameters: bool) -> Result<Url> {
    let mut path = String::new();
    for segment in job.split('/').filter(|s| !s.is_empty()) {
        path.push_str("/job/");
        path.push_str(&urlencoding::encode(segment));
    }
    path.push_str(if with_parameters {
        "/buildWithParameters"
    } else {
        "/build"
    });
    parse_with_path(base, &path)
}

fn crumb_url(base: &str) -> Result<Url> {
    parse_with_path(base, "/crumbIssuer/api/json")
}

fn parse_with_path(base: &str, path: &str) -> Result<Url> {
    let joined = format!("{}{path}", base.trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| Error::Ci(format!("invalid CI URL {joined}: {e}")))
}

#[async_trait]
impl CiTrigger for JenkinsTrigger {
    async fn trigger(&self, target: &CiTarget, context: &BTreeMap<String, String>) -> Result<()> {
        let parameters = target.resolve_parameters(context);
        let url = build_url(&target.url, &target.job, !parameters.is_empty())?;

        let mut request = Self::authorize(target, self.client.post(url.clone()));
        if !parameters.is_empty() {
            request = request.query(&parameters);
        }
        if target.crumb {
            let crumb = self.fetch_crumb(target).await?;
            request = request.header(crumb.crumb_request_field, crumb.crumb);
        }

        debug!(%url, job = %target.job, "Triggering CI build");
        let response = request
            .send()
            .await
            .map_err(|e| Error::Ci(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Ci(format!("HTTP {status}: {body}")));
        }

        debug!(%status, "CI build queued");
        Ok(())
    }
}
