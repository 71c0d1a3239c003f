//! WhatsApp hand-off.
//!
//! Builds `wa.me` deep links with a prefilled message and launches them.
//! Launching is a one-way effect: nothing about its outcome flows back into
//! the storefront.

use tracing::{info, warn};

use crate::catalog::{PlanRecord, ServiceRecord};

const WHATSAPP_BASE_URL: &str = "https://wa.me/";

pub const PLAN_INTEREST_TEMPLATE: &str = "Hi! I'm interested in the {serviceName} {planDuration} plan for {price} {currency}. Can you help me with the subscription?";

/// Replace `{key}` placeholders in a single pass.
///
/// Placeholders without a substitution are kept as written, and substituted
/// values are never scanned for further placeholders.
pub fn fill_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let replacement = candidate.find('}').and_then(|end| {
            let key = &candidate[1..end];
            substitutions
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });

        match replacement {
            Some((value, end)) => {
                output.push_str(value);
                rest = &candidate[end + 1..];
            }
            None => {
                output.push('{');
                rest = &candidate[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// The message sent when the visitor picks a plan.
pub fn plan_interest_message(service: &ServiceRecord, plan: &PlanRecord) -> String {
    fill_template(PLAN_INTEREST_TEMPLATE, &plan_substitutions(service, plan))
}

fn plan_substitutions<'a>(service: &'a ServiceRecord, plan: &'a PlanRecord) -> [(&'static str, &'a str); 4] {
    [
        ("serviceName", service.name.as_str()),
        ("planDuration", plan.duration.as_str()),
        ("price", plan.price.as_str()),
        ("currency", plan.currency.as_str()),
    ]
}

/// Build a `https://wa.me/<digits>?text=<message>` link.
///
/// Only a single leading `+` is stripped from the phone number; everything
/// else is passed through untouched. The substituted message is
/// percent-encoded as a query component.
pub fn build_handoff_url(phone_number: &str, template: &str, substitutions: &[(&str, &str)]) -> String {
    let digits = phone_number.strip_prefix('+').unwrap_or(phone_number);
    let message = fill_template(template, substitutions);
    format!("{WHATSAPP_BASE_URL}{digits}?text={}", urlencoding::encode(&message))
}

/// Hand-off link for a specific plan.
pub fn plan_handoff_url(phone_number: &str, service: &ServiceRecord, plan: &PlanRecord) -> String {
    // Filling again with no substitutions leaves the message unchanged.
    build_handoff_url(phone_number, &plan_interest_message(service, plan), &[])
}

/// Opens hand-off URLs outside the terminal.
pub trait Launcher {
    /// Fire-and-forget navigation to `url`.
    fn launch(&self, url: &str);
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, url: &str) {
        info!(url, "Launching hand-off");
        if let Err(error) = open::that_detached(url) {
            warn!(url, %error, "Platform refused to open hand-off URL");
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::{Arc, Mutex};

    use super::Launcher;

    /// Records launched URLs instead of opening them.
    #[derive(Clone, Default)]
    pub struct RecordingLauncher {
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingLauncher {
        pub fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, url: &str) {
            self.urls.lock().unwrap().push(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn netflix() -> (ServiceRecord, PlanRecord) {
        let plan = PlanRecord {
            duration: "1 Month".to_string(),
            price: "9.99".to_string(),
            currency: "USD".to_string(),
            features: vec!["HD".to_string()],
            popular: false,
        };
        let service = ServiceRecord {
            id: "netflix".to_string(),
            name: "Netflix".to_string(),
            description: "Movies".to_string(),
            logo: "N".to_string(),
            color: String::new(),
            bg_color: String::new(),
            border_color: String::new(),
            plans: vec![plan.clone()],
        };
        (service, plan)
    }

    #[test]
    fn test_leading_plus_is_stripped() {
        assert_eq!(
            build_handoff_url("+15551234567", "hi", &[]),
            "https://wa.me/15551234567?text=hi"
        );
    }

    #[test]
    fn test_phone_is_otherwise_untouched() {
        assert_eq!(
            build_handoff_url("1 555-123+4", "hi", &[]),
            "https://wa.me/1 555-123+4?text=hi"
        );
        assert_eq!(build_handoff_url("++1", "hi", &[]), "https://wa.me/+1?text=hi");
    }

    #[test]
    fn test_message_is_percent_encoded() {
        let message = "Hi there! 50% off & more? a/b=c";
        let url = build_handoff_url("+1", message, &[]);
        let encoded = url.strip_prefix("https://wa.me/1?text=").unwrap();

        assert!(encoded.contains("%20"));
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('?'));
        assert_eq!(urlencoding::decode(encoded).unwrap(), message);
    }

    #[test]
    fn test_multibyte_message_round_trips() {
        let message = "café €9,99 — ok? 日本語 🎵";
        let url = build_handoff_url("+1", message, &[]);
        let encoded = url.strip_prefix("https://wa.me/1?text=").unwrap();

        assert!(encoded.is_ascii());
        assert!(encoded.starts_with("caf%C3%A9%20%E2%82%AC9%2C99"));
        assert_eq!(urlencoding::decode(encoded).unwrap(), message);
    }

    #[test]
    fn test_plan_url_keeps_braces_in_names() {
        let (mut service, plan) = netflix();
        service.name = "Net{price}flix".to_string();
        let url = plan_handoff_url("+1", &service, &plan);
        let encoded = url.strip_prefix("https://wa.me/1?text=").unwrap();
        assert!(urlencoding::decode(encoded).unwrap().contains("Net{price}flix 1 Month"));
    }

    #[test]
    fn test_plan_interest_message() {
        let (service, plan) = netflix();
        assert_eq!(
            plan_interest_message(&service, &plan),
            "Hi! I'm interested in the Netflix 1 Month plan for 9.99 USD. Can you help me with the subscription?"
        );
    }

    #[test]
    fn test_plan_handoff_url_round_trips_message() {
        let (service, plan) = netflix();
        let url = plan_handoff_url("+15551234567", &service, &plan);
        let encoded = url.strip_prefix("https://wa.me/15551234567?text=").unwrap();
        assert_eq!(
            urlencoding::decode(encoded).unwrap(),
            plan_interest_message(&service, &plan)
        );
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        assert_eq!(fill_template("a {missing} b", &[]), "a {missing} b");
        assert_eq!(fill_template("{open", &[("open", "x")]), "{open");
        assert_eq!(fill_template("}{x}{", &[("x", "1")]), "}1{");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let output = fill_template("{a} {b}", &[("a", "{b}"), ("b", "2")]);
        assert_eq!(output, "{b} 2");
    }

    #[test]
    fn test_recording_launcher() {
        let launcher = testing::RecordingLauncher::default();
        launcher.launch("https://wa.me/1?text=hi");
        assert_eq!(launcher.urls(), vec!["https://wa.me/1?text=hi".to_string()]);
    }
}
