//! Intent routing: one ordered rule table, first match wins.
//!
//! Routing itself only decides; side effects beyond the activity touch are
//! left to [`super::handlers::execute`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::{
    base::{
        config::Config,
        types::{ChatMessage, IgnoreReason, Intent},
    },
    state::SessionState,
};

use super::{
    classifier::{Classification, Classifier, contains_any, lowered},
    faq::FaqResolver,
};

/// Upper bound for a user-supplied pause length (one day).
const MAX_PAUSE_MINUTES: u64 = 24 * 60;

// Rules.

/// The message as the rules see it.
pub struct RouteInput<'a> {
    pub message: &'a ChatMessage,
    /// Trimmed text.
    pub text: &'a str,
    /// Trimmed, lowercased text.
    pub lowered: String,
    pub classification: Classification,
}

pub type RuleFn = fn(&Router, &RouteInput<'_>) -> Option<Intent>;

/// A named routing rule.
pub struct RouteRule {
    pub name: &'static str,
    pub apply: RuleFn,
}

/// Rules in evaluation order.
pub const RULES: &[RouteRule] = &[
    RouteRule { name: "operator_inquiry", apply: operator_inquiry_rule },
    RouteRule { name: "inquiry", apply: inquiry_rule },
    RouteRule { name: "content_filter", apply: content_filter_rule },
    RouteRule { name: "gratitude", apply: gratitude_rule },
    RouteRule { name: "help", apply: help_rule },
    RouteRule { name: "pairing_lookup", apply: pairing_rule },
    RouteRule { name: "notice_summary", apply: notice_rule },
    RouteRule { name: "pause", apply: pause_rule },
    RouteRule { name: "faq", apply: faq_rule },
];

fn operator_inquiry_rule(router: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    input.text.starts_with(router.operator_inquiry_command.as_str()).then_some(Intent::Inquiry { include_operator: true })
}

fn inquiry_rule(router: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    (input.text == router.inquiry_command).then_some(Intent::Inquiry { include_operator: false })
}

fn content_filter_rule(_: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    let c = &input.classification;
    (c.is_blocked || c.is_injection_attempt).then(|| c.verdict()).flatten()
}

fn gratitude_rule(_: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    input.classification.is_gratitude.then_some(Intent::Gratitude)
}

fn help_rule(_: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    input.classification.is_help_request.then_some(Intent::Help)
}

fn pairing_rule(router: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    contains_any(&input.lowered, &router.pairing_keywords).then_some(Intent::PairingLookup)
}

fn notice_rule(router: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    contains_any(&input.lowered, &router.notice_keywords).then_some(Intent::NoticeSummary)
}

fn pause_rule(router: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    if !contains_any(&input.lowered, &router.pause_keywords) {
        return None;
    }

    let minutes = parse_minutes(input.text).unwrap_or(router.pause_default_minutes);
    Some(Intent::Pause { minutes })
}

fn faq_rule(router: &Router, input: &RouteInput<'_>) -> Option<Intent> {
    let (answer, matched) = router.faq.resolve(input.text);

    if matched {
        Some(Intent::Faq { answer })
    } else {
        Some(Intent::Fallback)
    }
}

/// First run of ASCII digits, e.g. `멈춰 5` is five minutes.
fn parse_minutes(text: &str) -> Option<u64> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .and_then(|run| run.parse::<u64>().ok())
        .filter(|minutes| *minutes > 0)
        .map(|minutes| minutes.min(MAX_PAUSE_MINUTES))
}

// Structs.

/// Intent router.
#[derive(Debug, Clone)]
pub struct Router {
    classifier: Classifier,
    faq: FaqResolver,
    inquiry_command: String,
    operator_inquiry_command: String,
    pairing_keywords: Vec<String>,
    notice_keywords: Vec<String>,
    pause_keywords: Vec<String>,
    pause_default_minutes: u64,
}

impl Router {
    #[instrument(name = "Router::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: Classifier::new(config),
            faq: FaqResolver::new(&config.faq_pairs(), config.fuzzy_match_threshold),
            inquiry_command: config.inquiry_command.trim().to_string(),
            operator_inquiry_command: config.operator_inquiry_command.trim().to_string(),
            pairing_keywords: lowered(&config.pairing_keywords),
            notice_keywords: lowered(&config.notice_keywords),
            pause_keywords: lowered(&config.pause_keywords),
            pause_default_minutes: config.pause_default_minutes.max(1),
        }
    }

    /// Route one message.
    ///
    /// Applies the gates (self, allow-list, pause), keeps a tracked channel
    /// alive, then evaluates [`RULES`].
    #[instrument(skip_all, fields(channel_id = message.channel_id))]
    pub fn route(&self, message: &ChatMessage, bot_user_id: u64, state: &SessionState, now: Instant, now_utc: DateTime<Utc>) -> Intent {
        if message.author_id == bot_user_id {
            return Intent::Ignore(IgnoreReason::SelfAuthored);
        }

        if !state.allowed.contains(message.channel_id) {
            return Intent::Ignore(IgnoreReason::ChannelNotAllowed);
        }

        if state.pauses.is_paused(message.channel_id, now) {
            return Intent::Ignore(IgnoreReason::Paused);
        }

        state.activity.touch(message.channel_id, now_utc);

        self.select(message)
    }

    /// Evaluate the rule table against an accepted message.
    pub fn select(&self, message: &ChatMessage) -> Intent {
        let text = message.text.trim();
        let input = RouteInput {
            message,
            text,
            lowered: text.to_lowercase(),
            classification: self.classifier.classify(text),
        };

        for rule in RULES {
            if let Some(intent) = (rule.apply)(self, &input) {
                debug!("Rule `{}` selected `{}`.", rule.name, intent.name());
                return intent;
            }
        }

        Intent::Fallback
    }
}

// Tests.
