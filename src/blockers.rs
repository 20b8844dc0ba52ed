use log::{error, warn};

use crate::clients::bugzilla::BugzillaClient;
use crate::clients::jira::JiraClient;
use crate::config::{BlockerRegistry, JobBlockers};
use crate::report::BlockerRef;

/// Result of resolving one tracker's blocker list for a single job: the
/// display entries plus the raw ids that were consulted, which the
/// caller folds into the run-wide totals.
#[derive(Debug, Default)]
pub struct ResolvedBlockers {
    pub refs: Vec<BlockerRef>,
    pub seen_ids: Vec<u64>,
}

impl ResolvedBlockers {
    fn single(blocker: BlockerRef) -> Self {
        Self {
            refs: vec![blocker],
            seen_ids: Vec::new(),
        }
    }
}

fn registry_ids<'a>(
    job_name: &str,
    registry: Option<&'a BlockerRegistry>,
    pick: impl Fn(&'a JobBlockers) -> Option<&'a [u64]>,
) -> Option<&'a [u64]> {
    registry.and_then(|r| r.lookup(job_name)).and_then(pick)
}

/// Resolves the Bugzilla blocker list recorded for `job_name`.
///
/// A missing registry, job, or `bz` key degrades to a single placeholder
/// entry; the reserved id `0` short-circuits to the "no bug on file"
/// sentinel and wins over any other ids listed alongside it.
pub async fn resolve_bugs(
    job_name: &str,
    registry: Option<&BlockerRegistry>,
    client: &BugzillaClient,
) -> ResolvedBlockers {
    let Some(ids) = registry_ids(job_name, registry, |b| b.bz.as_deref()) else {
        error!("No Bugzilla blocker data on record for job {job_name}");
        return ResolvedBlockers::single(BlockerRef::Placeholder {
            name: "Could not find relevant bug".to_string(),
            url: None,
        });
    };

    if ids.contains(&0) {
        if ids.len() > 1 {
            warn!("Job {job_name} mixes the 0 sentinel with real bug ids; 0 wins");
        }
        return ResolvedBlockers::single(BlockerRef::Sentinel {
            name: "No bug on file".to_string(),
        });
    }

    let mut resolved = ResolvedBlockers::default();
    for &id in ids {
        resolved.seen_ids.push(id);
        let url = client.browse_url(id);
        match client.bug_summary(id).await {
            Ok(summary) => resolved.refs.push(BlockerRef::Resolved { name: summary, url }),
            Err(e) => {
                warn!("Bugzilla API call error for bug {id}: {e}");
                resolved.refs.push(BlockerRef::Placeholder {
                    name: format!("{id}: Bugzilla API call error"),
                    url: Some(url),
                });
            }
        }
    }
    resolved
}

/// Resolves the Jira blocker list recorded for `job_name`.
///
/// Same policy as [`resolve_bugs`], against the `jira` key.
pub async fn resolve_tickets(
    job_name: &str,
    registry: Option<&BlockerRegistry>,
    client: &JiraClient,
) -> ResolvedBlockers {
    let Some(ids) = registry_ids(job_name, registry, |b| b.jira.as_deref()) else {
        error!("No Jira blocker data on record for job {job_name}");
        return ResolvedBlockers::single(BlockerRef::Placeholder {
            name: "Could not find relevant ticket".to_string(),
            url: None,
        });
    };

    if ids.contains(&0) {
        if ids.len() > 1 {
            warn!("Job {job_name} mixes the 0 sentinel with real ticket ids; 0 wins");
        }
        return ResolvedBlockers::single(BlockerRef::Sentinel {
            name: "No ticket on file".to_string(),
        });
    }

    let mut resolved = ResolvedBlockers::default();
    for &id in ids {
        resolved.seen_ids.push(id);
        let url = client.browse_url(id);
        match client.issue_summary(id).await {
            Ok(summary) => resolved.refs.push(BlockerRef::Resolved { name: summary, url }),
            Err(e) => {
                warn!("Jira API call error for ticket {id}: {e}");
                resolved.refs.push(BlockerRef::Placeholder {
                    name: format!("{id}: Jira API call error"),
                    url: Some(url),
                });
            }
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry(yaml: &str) -> BlockerRegistry {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[tokio::test]
    async fn test_missing_registry_yields_placeholder() {
        let client = BugzillaClient::new("https://bugzilla.example.com").unwrap();
        let resolved = resolve_bugs("nightly-16-deploy", None, &client).await;

        assert_eq!(
            resolved.refs,
            vec![BlockerRef::Placeholder {
                name: "Could not find relevant bug".to_string(),
                url: None,
            }]
        );
        assert!(resolved.seen_ids.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_job_yields_placeholder() {
        let registry = registry("other-job:\n  jira: [7]\n");
        let client = JiraClient::new("https://jira.example.com", true).unwrap();
        let resolved = resolve_tickets("nightly-16-deploy", Some(&registry), &client).await;

        assert_eq!(resolved.refs.len(), 1);
        assert_eq!(resolved.refs[0].name(), "Could not find relevant ticket");
        assert_eq!(resolved.refs[0].url(), None);
    }

    #[tokio::test]
    async fn test_missing_tracker_key_yields_placeholder() {
        let registry = registry("nightly-16-deploy:\n  jira: [7]\n");
        let client = BugzillaClient::new("https://bugzilla.example.com").unwrap();
        let resolved = resolve_bugs("nightly-16-deploy", Some(&registry), &client).await;

        assert_eq!(resolved.refs[0].name(), "Could not find relevant bug");
    }

    #[tokio::test]
    async fn test_zero_id_short_circuits_to_sentinel() {
        let registry = registry("nightly-16-deploy:\n  bz: [0]\n");
        // No mocks registered; a real lookup attempt would fail loudly.
        let client = BugzillaClient::new("https://bugzilla.invalid").unwrap();
        let resolved = resolve_bugs("nightly-16-deploy", Some(&registry), &client).await;

        assert_eq!(
            resolved.refs,
            vec![BlockerRef::Sentinel {
                name: "No bug on file".to_string(),
            }]
        );
        assert!(resolved.seen_ids.is_empty());
    }

    #[tokio::test]
    async fn test_zero_wins_over_real_ids() {
        let registry = registry("nightly-16-deploy:\n  bz: [1234, 0, 5678]\n");
        let client = BugzillaClient::new("https://bugzilla.invalid").unwrap();
        let resolved = resolve_bugs("nightly-16-deploy", Some(&registry), &client).await;

        assert_eq!(resolved.refs.len(), 1);
        assert_eq!(resolved.refs[0].name(), "No bug on file");
        assert!(resolved.seen_ids.is_empty());
    }

    #[tokio::test]
    async fn test_resolved_and_failed_lookups_keep_id_order() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/rest/bug/101")
            .with_body(json!({"bugs": [{"summary": "first bug"}]}).to_string())
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/rest/bug/102")
            .with_status(503)
            .create_async()
            .await;

        let registry = registry("nightly-16-deploy:\n  bz: [101, 102]\n");
        let client = BugzillaClient::new(&server.url()).unwrap();
        let resolved = resolve_bugs("nightly-16-deploy", Some(&registry), &client).await;

        assert_eq!(resolved.seen_ids, vec![101, 102]);
        assert_eq!(
            resolved.refs,
            vec![
                BlockerRef::Resolved {
                    name: "first bug".to_string(),
                    url: format!("{}/show_bug.cgi?id=101", server.url()),
                },
                BlockerRef::Placeholder {
                    name: "102: Bugzilla API call error".to_string(),
                    url: Some(format!("{}/show_bug.cgi?id=102", server.url())),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_still_counts_the_id() {
        let mut server = mockito::Server::new_async().await;
        let _broken = server
            .mock("GET", "/rest/api/2/issue/42")
            .with_status(500)
            .create_async()
            .await;

        let registry = registry("nightly-16-deploy:\n  jira: [42]\n");
        let client = JiraClient::new(&server.url(), true).unwrap();
        let resolved = resolve_tickets("nightly-16-deploy", Some(&registry), &client).await;

        assert_eq!(resolved.seen_ids, vec![42]);
        assert_eq!(resolved.refs[0].name(), "42: Jira API call error");
        assert_eq!(
            resolved.refs[0].url(),
            Some(format!("{}/browse/42", server.url()).as_str())
        );
    }
}
