use lettre::message::header::ContentType;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{error, info};
use std::path::Path;

use crate::config::Config;
use crate::error::Result;

/// Where the report lands when SMTP delivery fails.
pub const FALLBACK_PATH: &str = "report.html";

/// Emails the rendered report, falling back to a local HTML file on any
/// transport failure. The fallback path still completes the run with
/// exit code 0.
pub async fn deliver_or_fallback(
    config: &Config,
    from: &str,
    html: &str,
    fallback: &Path,
) -> Result<()> {
    match send(config, from, html).await {
        Ok(()) => {
            info!("Report emailed to {}", config.email_to);
            Ok(())
        }
        Err(e) => {
            error!("Error sending email report - HTML file generated: {e}");
            std::fs::write(fallback, html)?;
            Ok(())
        }
    }
}

async fn send(config: &Config, from: &str, html: &str) -> Result<()> {
    let message = Message::builder()
        .from(from.parse()?)
        .to(config.email_to.parse()?)
        .subject(config.email_subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())?;

    // Plain relay on the configured port, upgrading to STARTTLS when
    // the server offers it.
    let tls = TlsParameters::new(config.smtp_host.clone())?;
    let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.smtp_host.as_str())
        .port(config.smtp_port)
        .tls(Tls::Opportunistic(tls))
        .build();
    transport.send(message).await?;

    Ok(())
}
