use log::{info, warn};
use regex::Regex;
use std::sync::OnceLock;

use crate::blockers::{resolve_bugs, resolve_tickets};
use crate::clients::bugzilla::BugzillaClient;
use crate::clients::jenkins::{BuildInfo, BuildRef, JenkinsClient, JobInfo};
use crate::clients::jira::JiraClient;
use crate::config::BlockerRegistry;
use crate::error::{ReportError, Result};
use crate::report::{BlockerRef, JobRecord, Outcome, Summary};

/// Everything a rendered report needs: one row per classified job plus
/// the run-wide counters.
#[derive(Debug)]
pub struct CollectedReport {
    pub rows: Vec<JobRecord>,
    pub summary: Summary,
}

/// Walks every job matching the configured filter and classifies its
/// last completed build, resolving blockers for the broken ones.
pub struct ReportCollector<'a> {
    pub jenkins: &'a JenkinsClient,
    pub bugzilla: &'a BugzillaClient,
    pub jira: &'a JiraClient,
    pub registry: Option<&'a BlockerRegistry>,
}

/// First run of digits in the job name, by convention the product
/// version the job targets.
fn infer_version(job_name: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\d+").expect("valid version pattern"));
    pattern
        .find(job_name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl ReportCollector<'_> {
    /// Collects report rows for every job whose name contains `filter`.
    ///
    /// Jobs are processed oldest-first (the server lists newest-first)
    /// so successive reports keep a stable row order. A fetch failure
    /// for a single job skips that job and keeps the run going; it is
    /// excluded from every summary denominator.
    pub async fn collect(&self, filter: &str) -> Result<CollectedReport> {
        let mut names: Vec<String> = self
            .jenkins
            .list_jobs()
            .await?
            .into_iter()
            .filter(|name| name.contains(filter))
            .collect();
        names.reverse();

        let mut rows = Vec::with_capacity(names.len());
        let mut summary = Summary::default();

        for name in names {
            let (info, build_ref, build) = match self.fetch_job(&name).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!("Jenkins API call error for job {name}: {e}");
                    continue;
                }
            };

            let outcome = Outcome::classify(build.result.as_deref());
            summary.record(outcome);

            let (bugs, tickets) = if outcome.needs_blockers() {
                let bugs = resolve_bugs(&name, self.registry, self.bugzilla).await;
                let tickets = resolve_tickets(&name, self.registry, self.jira).await;
                summary.record_bugs(&bugs.seen_ids);
                summary.record_tickets(&tickets.seen_ids);
                (bugs.refs, tickets.refs)
            } else {
                (
                    vec![BlockerRef::not_applicable()],
                    vec![BlockerRef::not_applicable()],
                )
            };

            rows.push(JobRecord {
                version: infer_version(&name),
                url: info.url,
                build_number: build_ref.number,
                build_url: build_ref.url,
                name,
                outcome,
                bugs,
                tickets,
            });
        }

        info!("Classified {} jobs matching \"{filter}\"", summary.num_jobs());
        Ok(CollectedReport { rows, summary })
    }

    async fn fetch_job(&self, name: &str) -> Result<(JobInfo, BuildRef, BuildInfo)> {
        let info = self.jenkins.job_info(name).await?;
        let build_ref = info
            .last_completed_build
            .clone()
            .ok_or_else(|| ReportError::Api(format!("job {name} has no completed builds")))?;
        let build = self.jenkins.build_info(name, build_ref.number).await?;
        Ok((info, build_ref, build))
    }
}
