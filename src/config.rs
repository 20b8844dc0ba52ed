use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Main configuration for a report run.
///
/// Loaded from a YAML file; a missing or unparsable file aborts the run
/// before any network call is made.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Jenkins server base URL
    pub jenkins_url: String,

    /// Jenkins account used for API calls
    pub username: String,

    /// API token for the Jenkins account
    pub api_token: String,

    /// Bugzilla base URL, used for both REST lookups and browse links
    pub bugzilla_url: String,

    /// Jira base URL
    pub jira_url: String,

    /// Verify the Jira server's TLS certificate
    #[serde(default = "default_certificate")]
    pub certificate: bool,

    /// Substring a job name must contain to be included in the report
    pub job_search_field: String,

    /// Subject line of the report email
    pub email_subject: String,

    /// Recipient of the report email
    pub email_to: String,

    /// SMTP relay the report is sent through
    pub smtp_host: String,

    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_certificate() -> bool {
    true
}

fn default_smtp_port() -> u16 {
    25
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Per-job blocker lists keyed by job name, kept in file order.
///
/// Read-only for the duration of a run. A load failure is not fatal:
/// the caller degrades to placeholder resolution for every job.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BlockerRegistry {
    jobs: IndexMap<String, JobBlockers>,
}

/// Blocker ids recorded for one job. A missing tracker key is distinct
/// from an empty list: it means nobody filed an entry for that tracker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobBlockers {
    pub bz: Option<Vec<u64>>,
    pub jira: Option<Vec<u64>>,
}

impl BlockerRegistry {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read blockers file: {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse blockers file: {}", path.display()))
    }

    pub fn lookup(&self, job_name: &str) -> Option<&JobBlockers> {
        self.jobs.get(job_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
jenkins_url: "https://ci.example.com"
username: "reporter"
api_token: "t0ken"
bugzilla_url: "https://bugzilla.example.com"
jira_url: "https://jira.example.com"
job_search_field: "nightly"
email_subject: "CI report"
email_to: "team@example.com"
smtp_host: "smtp.example.com"
"#;

    #[test]
    fn test_load_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", FULL_CONFIG).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.jenkins_url, "https://ci.example.com");
        assert_eq!(config.username, "reporter");
        assert_eq!(config.job_search_field, "nightly");
        assert_eq!(config.email_to, "team@example.com");
        assert_eq!(config.smtp_port, 25);
        assert!(config.certificate);
    }

    #[test]
    fn test_certificate_can_be_disabled() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}certificate: false\n", FULL_CONFIG).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert!(!config.certificate);
    }

    #[test]
    fn test_missing_required_key_fails() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "jenkins_url: \"https://ci.example.com\"\n").unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_nonexistent_config_fails() {
        let result = Config::load(Path::new("nonexistent.yaml"));
        assert!(result.unwrap_err().to_string().contains("nonexistent.yaml"));
    }

    #[test]
    fn test_load_registry() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"
nightly-16-deploy:
  bz: [1234, 5678]
  jira: [42]
nightly-17-deploy:
  bz: [0]
"#
        )
        .unwrap();

        let registry = BlockerRegistry::load(temp_file.path()).unwrap();

        let entry = registry.lookup("nightly-16-deploy").unwrap();
        assert_eq!(entry.bz.as_deref(), Some(&[1234, 5678][..]));
        assert_eq!(entry.jira.as_deref(), Some(&[42][..]));

        // jira key absent, not empty
        let entry = registry.lookup("nightly-17-deploy").unwrap();
        assert_eq!(entry.bz.as_deref(), Some(&[0][..]));
        assert!(entry.jira.is_none());

        assert!(registry.lookup("unknown-job").is_none());
    }

    #[test]
    fn test_load_registry_rejects_garbage() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "- just\n- a\n- list\n").unwrap();

        assert!(BlockerRegistry::load(temp_file.path()).is_err());
    }
}
