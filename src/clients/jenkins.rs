use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::error::{ReportError, Result};

/// Jenkins JSON API client.
///
/// Every call is a single sequential request against the `api/json`
/// endpoints, authenticated with HTTP basic auth. Timeouts are whatever
/// the underlying HTTP client defaults to.
pub struct JenkinsClient {
    client: Client,
    base_url: Url,
    username: String,
    api_token: String,
}

/// Identity and server details captured during the initial handshake.
#[derive(Debug)]
pub struct ServerInfo {
    /// Mail address configured on the authenticated account. The report
    /// is sent from this address, so a missing one is a hard error.
    pub user_email: String,
    /// Jenkins version advertised by the server.
    pub version: String,
}

#[derive(Deserialize)]
struct WhoAmI {
    #[serde(default)]
    property: Vec<UserProperty>,
}

#[derive(Deserialize)]
struct UserProperty {
    #[serde(rename = "_class")]
    class: Option<String>,
    address: Option<String>,
}

#[derive(Deserialize)]
struct JobList {
    jobs: Vec<JobEntry>,
}

#[derive(Deserialize)]
struct JobEntry {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub url: String,
    pub last_completed_build: Option<BuildRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildRef {
    pub number: u64,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    /// `null` while a build is running; the server should only report
    /// finished builds here, but a missing result still classifies.
    pub result: Option<String>,
}

impl JenkinsClient {
    pub fn new(base_url: &str, username: &str, api_token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base_url = Url::parse(base_url)
            .map_err(|e| ReportError::Config(format!("Invalid Jenkins URL: {e}")))?;

        // Url::join drops the last path segment without this.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            client,
            base_url,
            username: username.to_owned(),
            api_token: api_token.to_owned(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ReportError::Config(format!("Invalid Jenkins URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Api(format!(
                "Jenkins returned {status} for {path}"
            )));
        }

        Ok(response.json().await?)
    }

    /// Verifies credentials and captures the caller's mail address and
    /// the server version. Any failure here aborts the run.
    pub async fn connect(&self) -> Result<ServerInfo> {
        let response = self
            .client
            .get(self.endpoint("api/json")?)
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Api(format!(
                "Jenkins handshake failed with {status}"
            )));
        }

        let version = response
            .headers()
            .get("X-Jenkins")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let me: WhoAmI = self.get_json("me/api/json").await?;
        let user_email = me
            .property
            .iter()
            .find(|p| {
                p.class
                    .as_deref()
                    .is_some_and(|c| c.ends_with("Mailer$UserProperty"))
            })
            .and_then(|p| p.address.clone())
            .ok_or_else(|| {
                ReportError::Api("Jenkins account has no mail address configured".to_string())
            })?;

        Ok(ServerInfo {
            user_email,
            version,
        })
    }

    /// Job names in the server's natural listing order.
    pub async fn list_jobs(&self) -> Result<Vec<String>> {
        let list: JobList = self.get_json("api/json?tree=jobs[name]").await?;
        Ok(list.jobs.into_iter().map(|j| j.name).collect())
    }

    pub async fn job_info(&self, name: &str) -> Result<JobInfo> {
        self.get_json(&format!(
            "job/{name}/api/json?tree=url,lastCompletedBuild[number,url]"
        ))
        .await
    }

    pub async fn build_info(&self, name: &str, number: u64) -> Result<BuildInfo> {
        self.get_json(&format!("job/{name}/{number}/api/json?tree=result"))
            .await
    }
}
