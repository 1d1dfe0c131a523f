use std::sync::LazyLock;

use monitor_core::{DomainProfile, EventBody, JobId};
use monitor_logging::monitor_warn;
use regex::Regex;
use reqwest::header::ACCEPT;
use url::Url;

use crate::{SubmitError, SubmitReport};

static JOB_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/jobs/([a-f0-9]{32})").expect("valid regex"));
static BARE_JOB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-f0-9]{32}\b").expect("valid regex"));

#[async_trait::async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, fields: &[(String, String)]) -> Result<SubmitReport, SubmitError>;
}

/// Posts job requests as a form, the way the job pages do.
#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    client: reqwest::Client,
    url: Url,
    profile: DomainProfile,
}

impl ReqwestSubmitter {
    pub fn new(client: reqwest::Client, url: Url, profile: DomainProfile) -> Self {
        Self {
            client,
            url,
            profile,
        }
    }
}

#[async_trait::async_trait]
impl JobSubmitter for ReqwestSubmitter {
    async fn submit(&self, fields: &[(String, String)]) -> Result<SubmitReport, SubmitError> {
        let response = self
            .client
            .post(self.url.clone())
            .header("X-Requested-With", "XMLHttpRequest")
            .header(ACCEPT, "application/json, text/plain, */*")
            .form(fields)
            .send()
            .await
            .map_err(SubmitError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            monitor_warn!("Submission to {} answered {}", self.url, status);
        }

        let text = response.text().await.map_err(SubmitError::Body)?;
        Ok(parse_submission_response(&self.profile, &text))
    }
}

/// Reads the job id from a submission response: JSON first, then the
/// legacy text/HTML fallback.
pub fn parse_submission_response(profile: &DomainProfile, text: &str) -> SubmitReport {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => {
            let body = EventBody::from_value(&value);
            match body.job_id.as_deref().and_then(JobId::parse) {
                Some(job_id) => SubmitReport::Tracked {
                    job_id,
                    summary: profile.summary_of(&body),
                },
                None => SubmitReport::Untracked,
            }
        }
        Err(_) => match extract_job_id_from_text(text) {
            Some(job_id) => SubmitReport::Tracked {
                job_id,
                summary: None,
            },
            None => SubmitReport::Untracked,
        },
    }
}

/// Looks for a `/jobs/<id>` link, then for any standalone 32-hex token.
pub fn extract_job_id_from_text(text: &str) -> Option<JobId> {
    let found = JOB_LINK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .or_else(|| BARE_JOB_ID.find(text))?;
    JobId::parse(&found.as_str().to_ascii_lowercase())
}
