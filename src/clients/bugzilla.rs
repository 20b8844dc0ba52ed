use reqwest::Client;
use serde::Deserialize;

use crate::error::{ReportError, Result};

/// Bugzilla REST client.
pub struct BugzillaClient {
    client: Client,
    /// REST endpoint base. The API rejects a trailing slash, so it is
    /// stripped here once.
    api_base: String,
    /// Raw configured value, used verbatim for browse links.
    browse_base: String,
}

#[derive(Deserialize)]
struct BugResponse {
    bugs: Vec<Bug>,
}

#[derive(Deserialize)]
struct Bug {
    summary: String,
}

impl BugzillaClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: base_url.trim_end_matches('/').to_string(),
            browse_base: base_url.to_string(),
        })
    }

    /// Fetches the one-line summary of a bug.
    pub async fn bug_summary(&self, id: u64) -> Result<String> {
        let url = format!("{}/rest/bug/{id}", self.api_base);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Api(format!(
                "Bugzilla returned {status} for bug {id}"
            )));
        }

        let body: BugResponse = response.json().await?;
        body.bugs
            .into_iter()
            .next()
            .map(|b| b.summary)
            .ok_or_else(|| ReportError::Api(format!("Bugzilla returned no data for bug {id}")))
    }

    /// Browse URL shown in the report. Derived by concatenation,
    /// independently of whether the summary lookup succeeds.
    pub fn browse_url(&self, id: u64) -> String {
        format!("{}/show_bug.cgi?id={id}", self.browse_base)
    }
}
