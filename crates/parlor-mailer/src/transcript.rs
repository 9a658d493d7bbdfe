//! Transcript and confirmation rendering.
//!
//! Deterministic text and HTML bodies. Roles are relabeled for a human
//! reader: `user` becomes "Visitor", `assistant` becomes the configured
//! product name. Visitor-supplied text is HTML-escaped in the HTML body.

use chrono::DateTime;

use parlor_core::chat::ChatRole;
use parlor_store::Transcript;

use crate::config::MailerConfig;
use crate::mailgun::OutgoingEmail;

const RULE: &str = "==================================================";

/// Render the site-owner transcript notification.
#[must_use]
pub fn render_transcript(transcript: &Transcript, config: &MailerConfig) -> OutgoingEmail {
    let session = &transcript.session;
    let visitor = non_empty_or(&session.visitor_name, "Website Visitor");

    OutgoingEmail {
        to: config.notify_to.clone(),
        subject: format!("Chat from {visitor} - {}", config.site_label),
        text: transcript_text(transcript, config),
        html: Some(transcript_html(transcript, config)),
    }
}

/// Render the visitor confirmation email.
#[must_use]
pub fn render_confirmation(email: &str, name: &str, config: &MailerConfig) -> OutgoingEmail {
    let greeting = if name.is_empty() {
        "Hi there".to_owned()
    } else {
        format!("Hi {name}")
    };
    let org = &config.from_name;
    let site = &config.site_label;

    let text = format!(
        "{greeting},\n\n\
         Thanks for reaching out to {org}! We've received your message and \
         will get back to you within one business day.\n\n\
         In the meantime, feel free to explore {site}\n\n\
         Best regards,\n{org}"
    );

    let html = format!(
        "<div style=\"max-width: 600px; margin: 0 auto; padding: 20px; \
         font-family: sans-serif; line-height: 1.6; color: #333;\">\n\
         <p>{greeting},</p>\n\
         <p>Thanks for reaching out to {org}! We've received your message and \
         will get back to you within one business day.</p>\n\
         <p>In the meantime, feel free to explore \
         <a href=\"https://{site}\">{site}</a></p>\n\
         <p>Best regards,<br>{org}</p>\n\
         </div>",
        greeting = escape_html(&greeting),
        org = escape_html(org),
        site = escape_html(site),
    );

    OutgoingEmail {
        to: email.to_owned(),
        subject: format!("Thanks for contacting {org}"),
        text,
        html: Some(html),
    }
}

fn transcript_text(transcript: &Transcript, config: &MailerConfig) -> String {
    let session = &transcript.session;
    let mut body = format!("New chat conversation from {}\n{RULE}\n\n", config.site_label);

    if !session.visitor_name.is_empty() || !session.visitor_email.is_empty() {
        body.push_str(&format!(
            "Visitor: {}\nEmail: {}\nSession ID: {}\nStarted: {}\n\n{RULE}\n\n",
            non_empty_or(&session.visitor_name, "Unknown"),
            non_empty_or(&session.visitor_email, "Not provided"),
            session.id,
            session.created_at,
        ));
    }

    body.push_str("Conversation:\n\n");
    for msg in &transcript.messages {
        body.push_str(&format!(
            "[{}] {}:\n{}\n\n",
            clock_time(&msg.created_at),
            role_label(msg.role, config),
            msg.content,
        ));
    }
    body
}

fn transcript_html(transcript: &Transcript, config: &MailerConfig) -> String {
    let session = &transcript.session;
    let mut html = format!(
        "<h2>New chat conversation from {}</h2>\n<hr>\n\
         <p><strong>Visitor:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Session ID:</strong> {}</p>\n\
         <p><strong>Started:</strong> {}</p>\n\
         <hr>\n<h3>Conversation:</h3>\n",
        escape_html(&config.site_label),
        escape_html(non_empty_or(&session.visitor_name, "Unknown")),
        escape_html(non_empty_or(&session.visitor_email, "Not provided")),
        escape_html(&session.id),
        escape_html(&session.created_at),
    );

    for msg in &transcript.messages {
        let bg = match msg.role {
            ChatRole::User => "#e3e3e3",
            ChatRole::Assistant => "#f8f8f8",
        };
        html.push_str(&format!(
            "<div style=\"background: {bg}; padding: 12px; margin: 8px 0; \
             border-radius: 8px;\">\n<strong>{}:</strong><br>\n{}\n</div>\n",
            escape_html(role_label(msg.role, config)),
            escape_html(&msg.content).replace('\n', "<br>"),
        ));
    }
    html
}

fn role_label(role: ChatRole, config: &MailerConfig) -> &str {
    match role {
        ChatRole::User => "Visitor",
        ChatRole::Assistant => &config.product_name,
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Time-of-day portion of an RFC 3339 timestamp, falling back to the raw
/// string when it does not parse.
fn clock_time(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|_| rfc3339.to_owned())
}

/// Minimal HTML escaping for untrusted visitor text.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_store::{MessageRow, SessionRow};

    fn config() -> MailerConfig {
        MailerConfig {
            domain: "mg.example.com".into(),
            api_key: "k".into(),
            notify_to: "owner@example.com".into(),
            product_name: "Parlor".into(),
            site_label: "example.com".into(),
            ..MailerConfig::default()
        }
    }

    fn transcript(name: &str, email: &str) -> Transcript {
        Transcript {
            session: SessionRow {
                id: "sess_1".into(),
                visitor_name: name.into(),
                visitor_email: email.into(),
                created_at: "2026-08-05T09:30:00+00:00".into(),
                updated_at: "2026-08-05T09:31:00+00:00".into(),
            },
            messages: vec![
                MessageRow {
                    id: "msg_1".into(),
                    session_id: "sess_1".into(),
                    role: ChatRole::User,
                    content: "hello".into(),
                    created_at: "2026-08-05T09:30:00+00:00".into(),
                },
                MessageRow {
                    id: "msg_2".into(),
                    session_id: "sess_1".into(),
                    role: ChatRole::Assistant,
                    content: "hi, how can I help?".into(),
                    created_at: "2026-08-05T09:30:05+00:00".into(),
                },
            ],
        }
    }

    #[test]
    fn transcript_goes_to_site_owner() {
        let email = render_transcript(&transcript("Jane", "jane@corp.co"), &config());
        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.subject, "Chat from Jane - example.com");
    }

    #[test]
    fn transcript_subject_falls_back_without_name() {
        let email = render_transcript(&transcript("", "jane@corp.co"), &config());
        assert_eq!(email.subject, "Chat from Website Visitor - example.com");
    }

    #[test]
    fn roles_are_relabeled_for_humans() {
        let email = render_transcript(&transcript("Jane", "jane@corp.co"), &config());
        assert!(email.text.contains("Visitor:\nhello"));
        assert!(email.text.contains("Parlor:\nhi, how can I help?"));
        assert!(!email.text.contains("assistant"));
    }

    #[test]
    fn header_includes_contact_fields() {
        let email = render_transcript(&transcript("Jane", "jane@corp.co"), &config());
        assert!(email.text.contains("Visitor: Jane"));
        assert!(email.text.contains("Email: jane@corp.co"));
        assert!(email.text.contains("Session ID: sess_1"));
        assert!(email.text.contains("Started: 2026-08-05T09:30:00+00:00"));
    }

    #[test]
    fn header_block_omitted_without_any_contact() {
        let email = render_transcript(&transcript("", ""), &config());
        assert!(!email.text.contains("Session ID:"));
        assert!(email.text.contains("Conversation:"));
    }

    #[test]
    fn message_lines_carry_clock_time() {
        let email = render_transcript(&transcript("Jane", "j@c.co"), &config());
        assert!(email.text.contains("[09:30:00] Visitor:"));
        assert!(email.text.contains("[09:30:05] Parlor:"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let t = transcript("Jane", "jane@corp.co");
        let first = render_transcript(&t, &config());
        let second = render_transcript(&t, &config());
        assert_eq!(first, second);
    }

    #[test]
    fn html_escapes_visitor_text() {
        let mut t = transcript("Jane", "jane@corp.co");
        t.messages[0].content = "<script>alert(1)</script>".into();
        let email = render_transcript(&t, &config());
        let html = email.html.unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn html_converts_newlines_to_breaks() {
        let mut t = transcript("Jane", "jane@corp.co");
        t.messages[0].content = "line one\nline two".into();
        let email = render_transcript(&t, &config());
        assert!(email.html.unwrap().contains("line one<br>line two"));
    }

    #[test]
    fn confirmation_greets_by_name() {
        let email = render_confirmation("jane@corp.co", "Jane", &config());
        assert_eq!(email.to, "jane@corp.co");
        assert!(email.text.starts_with("Hi Jane,"));
        assert_eq!(email.subject, "Thanks for contacting Parlor Chat");
    }

    #[test]
    fn confirmation_greets_anonymously_without_name() {
        let email = render_confirmation("jane@corp.co", "", &config());
        assert!(email.text.starts_with("Hi there,"));
    }

    #[test]
    fn confirmation_has_html_body() {
        let email = render_confirmation("jane@corp.co", "Jane", &config());
        let html = email.html.unwrap();
        assert!(html.contains("Hi Jane"));
        assert!(html.contains("https://example.com"));
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_raw() {
        assert_eq!(clock_time("not-a-time"), "not-a-time");
    }
}
