use email_digest::*;
use std::cell::RefCell;

const RAW: &str = "From: Alerts <alerts@example.com>\r\n\
                   Subject: =?UTF-8?B?U2VydmVyIGRvd24=?=\r\n\
                   Content-Type: text/plain\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   RGlzayBmdWxsIG9uIGRiLTE=";

struct FixedSummarizer(&'static str);

impl Summarizer for FixedSummarizer {
    fn summarize(&self, _request: &SummaryRequest) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct FailingSummarizer;

impl Summarizer for FailingSummarizer {
    fn summarize(&self, _request: &SummaryRequest) -> Result<String> {
        Err(ParseError::Summarizer("model overloaded".into()))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<(String, serde_json::Value)>>,
    fail: bool,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, webhook_url: &str, payload: &serde_json::Value) -> Result<()> {
        if self.fail {
            return Err(ParseError::Notifier("connection refused".into()));
        }
        self.sent
            .borrow_mut()
            .push((webhook_url.to_string(), payload.clone()));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingForwarder {
    sent: RefCell<Vec<(String, String)>>,
    fail: bool,
}

impl Forwarder for RecordingForwarder {
    fn forward(&self, raw: &str, to: &str) -> Result<()> {
        if self.fail {
            return Err(ParseError::Forwarder("mailbox full".into()));
        }
        self.sent.borrow_mut().push((raw.to_string(), to.to_string()));
        Ok(())
    }
}

fn config_with_webhook() -> DigestConfig {
    DigestConfig {
        webhook_url: Some("https://hooks.example.com/bot".into()),
        ..DigestConfig::default()
    }
}

#[test]
fn test_envelope_decodes_subject() {
    let envelope = Envelope::from_raw(RAW, &DigestConfig::default());

    assert_eq!(envelope.subject, "Server down");
    assert_eq!(envelope.from, "Alerts <alerts@example.com>");
}

#[test]
fn test_envelope_default_subject() {
    let raw = "From: a@example.com\r\n\r\nBody";

    let envelope = Envelope::from_raw(raw, &DigestConfig::default());

    assert_eq!(envelope.subject, "(no subject)");
}

#[test]
fn test_envelope_default_sender() {
    let config = DigestConfig::default();

    let envelope = Envelope::from_raw("Subject: Hi\r\n\r\nBody", &config);

    assert_eq!(envelope.subject, "Hi");
    assert_eq!(envelope.from, "(unknown sender)");
}

#[test]
fn test_envelope_unreadable_headers() {
    let envelope = Envelope::from_raw("garbage line\r\n\r\nBody", &DigestConfig::default());

    assert_eq!(envelope.subject, "(no subject)");
    assert_eq!(envelope.from, "(unknown sender)");
}

#[test]
fn test_summary_prompt_truncates_body() {
    let config = DigestConfig {
        summary_input_chars: 5,
        ..DigestConfig::default()
    };

    let request = summary_prompt("你好世界你好世界", &config);

    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, "system");
    assert_eq!(request.content(), "Email content:\n你好世界你");
}

#[test]
fn test_classify_icon() {
    let config = DigestConfig::default();

    assert_eq!(
        classify_icon("Payment Error on invoice", &config.icons, &config.default_icon),
        "🚨"
    );
    assert_eq!(
        classify_icon("Your OTP is 123456", &config.icons, &config.default_icon),
        "🔐"
    );
    assert_eq!(
        classify_icon("快递已发货", &config.icons, &config.default_icon),
        "📦"
    );
    assert_eq!(
        classify_icon("Lunch on Friday?", &config.icons, &config.default_icon),
        "📧"
    );
}

#[test]
fn test_notification_payload() {
    let envelope = Envelope {
        subject: "Invoice".into(),
        from: "billing@example.com".into(),
    };

    let notification = Notification::new(&envelope, "Bill of $20 due", &DigestConfig::default());
    let payload = notification.to_webhook_payload();

    assert_eq!(notification.icon, "💰");
    assert_eq!(payload["msgtype"], "text");
    let content = payload["text"]["content"].as_str().unwrap();
    assert!(content.starts_with("💰 New email\n"));
    assert!(content.contains("From: billing@example.com\n"));
    assert!(content.contains("Subject: Invoice\n"));
    assert!(content.ends_with("Bill of $20 due\n"));
}

#[test]
fn test_process_message_delivers() {
    let notifier = RecordingNotifier::default();

    let digest = process_message(
        RAW,
        &config_with_webhook(),
        &FixedSummarizer("Alert: disk full on db-1"),
        &notifier,
        &RecordingForwarder::default(),
    );

    assert_eq!(digest.body, "Disk full on db-1");
    assert_eq!(digest.notification.icon, "🚨");
    assert!(digest.delivered);
    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "https://hooks.example.com/bot");
}

#[test]
fn test_process_message_summarizer_failure() {
    let notifier = RecordingNotifier::default();

    let digest = process_message(
        RAW,
        &config_with_webhook(),
        &FailingSummarizer,
        &notifier,
        &RecordingForwarder::default(),
    );

    assert!(digest.summary.starts_with("Summarizer unavailable: "));
    assert!(digest.summary.contains("model overloaded"));
    assert!(digest.delivered);
}

#[test]
fn test_process_message_without_webhook_or_forwarding() {
    let notifier = RecordingNotifier::default();
    let forwarder = RecordingForwarder::default();

    let digest = process_message(
        RAW,
        &DigestConfig::default(),
        &FixedSummarizer("ok"),
        &notifier,
        &forwarder,
    );

    assert!(!digest.delivered);
    assert!(!digest.forwarded);
    assert!(notifier.sent.borrow().is_empty());
    assert!(forwarder.sent.borrow().is_empty());
}

#[test]
fn test_process_message_notifier_failure() {
    let notifier = RecordingNotifier {
        fail: true,
        ..RecordingNotifier::default()
    };

    let digest = process_message(
        RAW,
        &config_with_webhook(),
        &FixedSummarizer("ok"),
        &notifier,
        &RecordingForwarder::default(),
    );

    assert!(!digest.delivered);
}

#[test]
fn test_process_message_forwards_original() {
    let config = DigestConfig {
        forward_to: Some("me@example.com".into()),
        ..DigestConfig::default()
    };
    let forwarder = RecordingForwarder::default();

    let digest = process_message(
        RAW,
        &config,
        &FixedSummarizer("ok"),
        &RecordingNotifier::default(),
        &forwarder,
    );

    assert!(digest.forwarded);
    let sent = forwarder.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, RAW);
    assert_eq!(sent[0].1, "me@example.com");
}

#[test]
fn test_process_message_forwarder_failure() {
    let config = DigestConfig {
        forward_to: Some("me@example.com".into()),
        ..config_with_webhook()
    };
    let forwarder = RecordingForwarder {
        fail: true,
        ..RecordingForwarder::default()
    };

    let digest = process_message(
        RAW,
        &config,
        &FixedSummarizer("ok"),
        &RecordingNotifier::default(),
        &forwarder,
    );

    assert!(!digest.forwarded);
    assert!(digest.delivered);
}

#[test]
fn test_process_message_without_sender() {
    let digest = process_message(
        "Subject: Hi\r\n\r\nBody",
        &config_with_webhook(),
        &FixedSummarizer("ok"),
        &RecordingNotifier::default(),
        &RecordingForwarder::default(),
    );

    assert_eq!(digest.envelope.from, "(unknown sender)");
    assert_eq!(digest.body, "Body");
    assert!(digest.notification.text.contains("From: (unknown sender)\n"));
    assert!(digest.delivered);
}
