//! Templated email dispatch.
//!
//! [`EmailService::send_templated`] renders a named template into HTML,
//! derives the plain-text part by stripping markup and hands both to a
//! [`MailTransport`]. Failures never propagate: they are logged and reported
//! as `false`, so a broken mail server cannot fail the request that triggered
//! the email.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use kampus_config::EmailConfig;
use lettre::message::{Mailbox, MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, Transport};
use regex::Regex;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*)+").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("unknown email template: {0}")]
    UnknownTemplate(String),
    #[error("template {template} needs a value for {key}")]
    MissingValue { template: String, key: String },
    #[error("invalid email address {address}: {reason}")]
    Address { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
    #[error("mail delivery timed out after {0:?}")]
    Timeout(Duration),
    #[error("email delivery is disabled")]
    Disabled,
}

/// A fully rendered message for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Mailbox,
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub trait TemplateRenderer: Send + Sync {
    /// Render template `name` to HTML using the fields of `context`.
    fn render(&self, name: &str, context: &Value) -> Result<String, EmailError>;
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: OutgoingEmail) -> Result<(), EmailError>;
}

/// Templates compiled into the binary.
///
/// Placeholders are written `{{ key }}`; values come from the top-level fields
/// of the context object and are HTML-escaped.
#[derive(Debug, Clone)]
pub struct BuiltinTemplates {
    templates: HashMap<&'static str, &'static str>,
}

impl Default for BuiltinTemplates {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert("grade_posted", GRADE_POSTED);
        Self { templates }
    }
}

impl BuiltinTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: &'static str, body: &'static str) -> Self {
        self.templates.insert(name, body);
        self
    }
}

impl TemplateRenderer for BuiltinTemplates {
    fn render(&self, name: &str, context: &Value) -> Result<String, EmailError> {
        let body = self
            .templates
            .get(name)
            .ok_or_else(|| EmailError::UnknownTemplate(name.to_string()))?;

        let mut missing = None;
        let rendered = PLACEHOLDER.replace_all(body, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            match context.get(key) {
                Some(Value::String(s)) => escape_html(s),
                Some(Value::Null) | None => {
                    missing.get_or_insert_with(|| key.to_string());
                    String::new()
                }
                Some(other) => escape_html(&other.to_string()),
            }
        });

        match missing {
            Some(key) => Err(EmailError::MissingValue {
                template: name.to_string(),
                key,
            }),
            None => Ok(rendered.into_owned()),
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Plain-text rendition of an HTML body.
pub fn strip_tags(html: &str) -> String {
    let text = TAG.replace_all(html, "");
    let text = unescape_html(&text);
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// SMTP delivery through lettre.
///
/// The blocking send runs on the blocking pool; lettre's own socket timeout
/// bounds each SMTP command.
#[derive(Clone)]
pub struct SmtpTransport {
    mailer: lettre::SmtpTransport,
    from: Mailbox,
}

impl SmtpTransport {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let sender = config.sender();
        let from = sender.parse::<Mailbox>().map_err(|e| EmailError::Address {
            address: sender.clone(),
            reason: e.to_string(),
        })?;

        let mailer = if config.smtp_username.is_empty() {
            lettre::SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .timeout(Some(config.timeout))
                .build()
        } else {
            let creds = Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            );

            lettre::SmtpTransport::relay(&config.smtp_host)
                .map_err(|e| EmailError::Transport(format!("Failed to create SMTP relay: {}", e)))?
                .port(config.smtp_port)
                .timeout(Some(config.timeout))
                .credentials(creds)
                .build()
        };

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn deliver(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to)
            .subject(email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(email.html),
                    ),
            )
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| EmailError::Transport(format!("Task join error: {}", e)))?
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Transport used when SMTP is not configured. Nothing is sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn deliver(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        info!(to = %email.to, subject = %email.subject, "Email delivery disabled, message dropped");
        Err(EmailError::Disabled)
    }
}

pub struct EmailService {
    renderer: Arc<dyn TemplateRenderer>,
    transport: Arc<dyn MailTransport>,
    timeout: Duration,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl EmailService {
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        transport: Arc<dyn MailTransport>,
        timeout: Duration,
    ) -> Self {
        Self {
            renderer,
            transport,
            timeout,
        }
    }

    /// Built-in templates over SMTP, or over [`DisabledTransport`] when SMTP is
    /// off or cannot be configured.
    pub fn from_config(config: &EmailConfig) -> Self {
        let transport: Arc<dyn MailTransport> = if config.enabled {
            match SmtpTransport::new(config) {
                Ok(smtp) => Arc::new(smtp),
                Err(e) => {
                    error!(error = %e, "SMTP transport misconfigured, email disabled");
                    Arc::new(DisabledTransport)
                }
            }
        } else {
            warn!("SMTP_ENABLED is not set, email delivery disabled");
            Arc::new(DisabledTransport)
        };

        // one margin over lettre's per-command timeout for connect + handshake
        Self::new(
            Arc::new(BuiltinTemplates::new()),
            transport,
            config.timeout * 2,
        )
    }

    /// Render `template` with `context` and send it to `recipient`.
    ///
    /// Returns `true` once the transport accepted the message. Every failure
    /// is logged at `error` and reported as `false`.
    #[instrument(skip(self, context))]
    pub async fn send_templated(
        &self,
        subject: &str,
        template: &str,
        context: &Value,
        recipient: &str,
    ) -> bool {
        match self.try_send(subject, template, context, recipient).await {
            Ok(()) => {
                info!(to = %recipient, template, "Email sent");
                true
            }
            Err(e) => {
                error!(to = %recipient, template, error = %e, "Failed to send email");
                false
            }
        }
    }

    async fn try_send(
        &self,
        subject: &str,
        template: &str,
        context: &Value,
        recipient: &str,
    ) -> Result<(), EmailError> {
        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| EmailError::Address {
                address: recipient.to_string(),
                reason: e.to_string(),
            })?;
        let html = self.renderer.render(template, context)?;
        let text = strip_tags(&html);

        let email = OutgoingEmail {
            to,
            subject: subject.to_string(),
            html,
            text,
        };

        tokio::time::timeout(self.timeout, self.transport.deliver(email))
            .await
            .map_err(|_| EmailError::Timeout(self.timeout))?
    }
}

const GRADE_POSTED: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Grade posted</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
                    <tr>
                        <td style="background-color: #1E3A8A; padding: 24px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 24px;">Kampus</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px;">
                            <p>Hi {{ student_name }},</p>
                            <p>A final grade has been posted for {{ course_code }} {{ course_name }} ({{ semester }} {{ year }}).</p>
                            <p style="font-size: 20px;"><strong>{{ grade }}</strong></p>
                            <p>Your current GPA is {{ gpa }}.</p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>
"#;
