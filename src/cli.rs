use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};

use crate::clients::bugzilla::BugzillaClient;
use crate::clients::jenkins::JenkinsClient;
use crate::clients::jira::JiraClient;
use crate::collector::ReportCollector;
use crate::config::{BlockerRegistry, Config};
use crate::mailer;
use crate::output::html;

#[derive(Parser)]
#[command(name = "buildbrief")]
#[command(author, version, about = "An automated report generator for Jenkins CI", long_about = None)]
pub struct Cli {
    /// Configuration YAML file to use
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Blockers YAML file to use
    #[arg(long, default_value = "blockers.yaml")]
    blockers: PathBuf,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        // Fatal: nothing can run without the main configuration.
        let config = Config::load(&self.config).context("Error loading configuration data")?;

        // Not fatal: every blocker lookup degrades to a placeholder.
        let registry = match BlockerRegistry::load(&self.blockers) {
            Ok(registry) => Some(registry),
            Err(e) => {
                error!("Error loading blocker configuration data: {e:#}");
                None
            }
        };

        let jenkins = JenkinsClient::new(&config.jenkins_url, &config.username, &config.api_token)
            .context("Error connecting to Jenkins server")?;
        let server = jenkins
            .connect()
            .await
            .context("Error connecting to Jenkins server")?;
        info!(
            "Connected to Jenkins {} as {}",
            server.version, server.user_email
        );

        let header = format!(
            "Report generated by {} from Jenkins {} on {}",
            server.user_email,
            server.version,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let bugzilla = BugzillaClient::new(&config.bugzilla_url)?;
        let jira = JiraClient::new(&config.jira_url, config.certificate)?;

        let collector = ReportCollector {
            jenkins: &jenkins,
            bugzilla: &bugzilla,
            jira: &jira,
            registry: registry.as_ref(),
        };
        let report = collector.collect(&config.job_search_field).await?;

        let mut buf = Vec::new();
        html::render_report(&header, &report.rows, &report.summary, &mut buf)?;
        let htmlcode = String::from_utf8(buf).context("Rendered report is not valid UTF-8")?;

        mailer::deliver_or_fallback(
            &config,
            &server.user_email,
            &htmlcode,
            Path::new(mailer::FALLBACK_PATH),
        )
        .await?;

        Ok(())
    }
}
