//! Report email delivery.
//!
//! [`SmtpMailer`] sends messages over authenticated STARTTLS SMTP using
//! `lettre`; its settings come from [`AppConfig`] (`SMTP_HOST`, `SMTP_PORT`,
//! `SMTP_USERNAME`, `SMTP_PASSWORD`, `EMAIL_FROM_NAME`, `EMAIL_FROM_ADDRESS`).
//! [`compose_report_email`] renders the attendance summary sent from the
//! reports page into an HTML and a plain-text body.

use async_trait::async_trait;
use chrono::NaiveDate;
use db::reports::{ReportSummary, attendance_rate};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;
use std::fmt::Write;
use util::{
    config::AppConfig,
    mailer::{EmailAttachment, MailError, Mailer, OutgoingEmail},
};

/// Filename used when the client does not name the PDF.
pub const DEFAULT_REPORT_FILENAME: &str = "Attendance_Report.pdf";

/// Mailer backed by an async SMTP transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport from configuration. Nothing is sent or connected here.
    pub fn from_config(config: &AppConfig) -> Result<Self, MailError> {
        let from: Mailbox = format!(
            "{} <{}>",
            config.email_from_name, config.email_from_address
        )
        .parse()
        .map_err(|e| MailError::Address(format!("{e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message, MailError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| MailError::Address(format!("{e}")))?;

        let alternative = MultiPart::alternative()
            .singlepart(SinglePart::plain(email.text_body))
            .singlepart(SinglePart::html(email.html_body));

        let body = match email.attachment {
            Some(att) => {
                let content_type = ContentType::parse(&att.content_type)
                    .map_err(|e| MailError::Build(e.to_string()))?;
                MultiPart::mixed()
                    .multipart(alternative)
                    .singlepart(Attachment::new(att.filename).body(att.bytes, content_type))
            }
            None => alternative,
        };

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(body)
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

/// The report fields the email needs, as posted by the reports page.
///
/// Matches the shape of `GET /reports`; extra fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDigest {
    #[serde(default)]
    pub summary: ReportSummary,
    #[serde(default)]
    pub grade_data: Vec<DigestGrade>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestGrade {
    pub grade: i32,
    #[serde(default)]
    pub checked_in: u64,
    #[serde(default)]
    pub total: u64,
}

/// Human-readable event date, e.g. `Friday, June 12, 2026`.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Renders the report email for `to`.
///
/// The rate is recomputed from the summary counts, so an empty roster shows 0%.
pub fn compose_report_email(
    title: &str,
    to: &str,
    date: NaiveDate,
    digest: &ReportDigest,
    attachment: Option<EmailAttachment>,
) -> OutgoingEmail {
    let date_label = format_report_date(date);
    let summary = &digest.summary;
    let rate = attendance_rate(summary.total, summary.total_students);

    let mut text = format!(
        "{title}\nAttendance Report\n\nRecorded on {date_label}\n\nChecked in: {}\nTotal guests: {}\nOverall attendance rate: {rate}%\n\nGrade breakdown:\n",
        summary.total, summary.total_students
    );
    let mut rows = String::new();
    for g in &digest.grade_data {
        let _ = writeln!(text, "  Grade {}: {} / {}", g.grade, g.checked_in, g.total);
        let _ = write!(
            rows,
            r#"<tr><td style="padding:12px 10px;font-weight:bold;">Grade {}</td><td style="padding:12px 10px;text-align:center;color:#22c55e;">{}</td><td style="padding:12px 10px;text-align:right;color:#a0a0a0;">{} students</td></tr>"#,
            g.grade, g.checked_in, g.total
        );
    }

    let html = format!(
        r#"<div style="background-color:#000;color:#fff;font-family:Georgia,serif;max-width:600px;margin:0 auto;padding:40px;border:1px solid #d4af37;border-radius:16px;">
<h1 style="color:#d4af37;text-align:center;font-weight:300;text-transform:uppercase;">{title}</h1>
<p style="color:#a0a0a0;text-align:center;text-transform:uppercase;letter-spacing:3px;">Attendance Report</p>
<p style="text-align:center;">Recorded on {date_label}</p>
<p style="text-align:center;"><strong style="color:#d4af37;font-size:32px;">{checked}</strong> checked in of <strong>{total}</strong> guests</p>
<h3 style="color:#d4af37;font-weight:normal;">Grade Breakdown</h3>
<table style="width:100%;border-collapse:collapse;">
<thead><tr><th style="text-align:left;">Grade</th><th>Status</th><th style="text-align:right;">Capacity</th></tr></thead>
<tbody>{rows}</tbody>
</table>
<p style="text-align:center;color:#d4af37;font-size:24px;font-weight:bold;">{rate}%</p>
<p style="text-align:center;color:#a0a0a0;font-size:11px;text-transform:uppercase;">Overall Attendance Rate</p>
</div>"#,
        title = escape_html(title),
        checked = summary.total,
        total = summary.total_students,
    );

    OutgoingEmail {
        to: to.to_owned(),
        subject: format!("Attendance Report - {date_label}"),
        text_body: text,
        html_body: html,
        attachment,
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
