use reqwest::Client;
use serde::Deserialize;

use crate::error::{ReportError, Result};

/// Jira REST client.
pub struct JiraClient {
    client: Client,
    api_base: String,
    /// Raw configured value, used verbatim for browse links.
    browse_base: String,
}

#[derive(Deserialize)]
struct Issue {
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    summary: String,
}

impl JiraClient {
    /// `verify_certificate: false` disables TLS verification for this
    /// client only, for Jira instances behind internal CAs.
    pub fn new(base_url: &str, verify_certificate: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .danger_accept_invalid_certs(!verify_certificate)
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: base_url.trim_end_matches('/').to_string(),
            browse_base: base_url.to_string(),
        })
    }

    /// Fetches the one-line summary of a ticket.
    pub async fn issue_summary(&self, id: u64) -> Result<String> {
        let url = format!("{}/rest/api/2/issue/{id}", self.api_base);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Api(format!(
                "Jira returned {status} for issue {id}"
            )));
        }

        let issue: Issue = response.json().await?;
        Ok(issue.fields.summary)
    }

    /// Browse URL shown in the report. Derived by concatenation,
    /// independently of whether the summary lookup succeeds.
    pub fn browse_url(&self, id: u64) -> String {
        format!("{}/browse/{id}", self.browse_base)
    }
}
