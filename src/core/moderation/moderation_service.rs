// Moderation service - the synchronous gate every title, story segment and
// nickname passes through before it is stored.
//
// This service handles:
// - Picking the rule chain and lexicon for the content class
// - Extracting signals and walking the chain (first violation wins)
// - Rendering the single user-facing reason
//
// NO I/O here - the lexicon is loaded once at startup and shared read-only.

use super::lexicon::Lexicon;
use super::moderation_models::{
    ContentClass, ModerationConfig, ModerationResult, ReasonLocale, Violation,
};
use super::policy::{Evaluation, RuleSet};
use super::signals::SignalBundle;
use std::sync::Arc;

/// Lexicon and rule chain bound to one content class.
#[derive(Debug, Clone)]
struct ClassPolicy {
    lexicon: Arc<Lexicon>,
    rules: RuleSet,
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Content moderation gate.
///
/// Cheap to share: wrap it in an `Arc` and call it from any request handler.
#[derive(Debug, Clone)]
pub struct ModerationService {
    body: ClassPolicy,
    title: ClassPolicy,
    nickname: ClassPolicy,
    config: ModerationConfig,
    locale: ReasonLocale,
}

impl ModerationService {
    /// Create a gate that uses `lexicon` for every content class.
    pub fn new(lexicon: Lexicon, config: ModerationConfig, locale: ReasonLocale) -> Self {
        let lexicon = Arc::new(lexicon);
        let policy = |class| ClassPolicy {
            lexicon: Arc::clone(&lexicon),
            rules: RuleSet::for_class(class, &config),
        };

        Self {
            body: policy(ContentClass::Body),
            title: policy(ContentClass::Title),
            nickname: policy(ContentClass::Nickname),
            config: config.clone(),
            locale,
        }
    }

    /// Swap the lexicon used for one class (e.g. a stricter nickname list).
    pub fn with_class_lexicon(mut self, class: ContentClass, lexicon: Lexicon) -> Self {
        self.policy_mut(class).lexicon = Arc::new(lexicon);
        self
    }

    pub fn locale(&self) -> ReasonLocale {
        self.locale
    }

    fn policy(&self, class: ContentClass) -> &ClassPolicy {
        match class {
            ContentClass::Body => &self.body,
            ContentClass::Title => &self.title,
            ContentClass::Nickname => &self.nickname,
        }
    }

    fn policy_mut(&mut self, class: ContentClass) -> &mut ClassPolicy {
        match class {
            ContentClass::Body => &mut self.body,
            ContentClass::Title => &mut self.title,
            ContentClass::Nickname => &mut self.nickname,
        }
    }

    /// Check story segment text.
    pub fn moderate_content(&self, text: Option<&str>) -> ModerationResult {
        self.moderate(ContentClass::Body, text)
    }

    /// Check a story title.
    pub fn moderate_title(&self, text: Option<&str>) -> ModerationResult {
        self.moderate(ContentClass::Title, text)
    }

    /// Check a login nickname.
    pub fn moderate_nickname(&self, text: Option<&str>) -> ModerationResult {
        self.moderate(ContentClass::Nickname, text)
    }

    /// Run `text` through the chain for `class`.
    ///
    /// `None` stands for a missing or non-text value and is rejected like an
    /// empty string. Rejection is a normal result, never an error.
    pub fn moderate(&self, class: ContentClass, text: Option<&str>) -> ModerationResult {
        let violation = match text {
            Some(text) if !text.is_empty() => {
                let policy = self.policy(class);
                let signals = self.signals(policy, text);
                policy.rules.evaluate(&Evaluation {
                    text,
                    signals: &signals,
                })
            }
            _ => Some(Violation::Empty),
        };

        match violation {
            None => ModerationResult::accept(class, self.locale),
            Some(violation) => {
                tracing::debug!(
                    class = %class,
                    rule = violation.rule_name(),
                    "Content rejected by moderation gate"
                );
                ModerationResult::reject(violation, class, self.locale)
            }
        }
    }

    /// Every rule the text violates, in chain order.
    ///
    /// For debugging and the moderation preview endpoint only; callers that
    /// gate persistence must use `moderate` and its single reason.
    pub fn diagnose(&self, class: ContentClass, text: Option<&str>) -> Vec<Violation> {
        match text {
            Some(text) if !text.is_empty() => {
                let policy = self.policy(class);
                let signals = self.signals(policy, text);
                policy.rules.evaluate_all(&Evaluation {
                    text,
                    signals: &signals,
                })
            }
            _ => vec![Violation::Empty],
        }
    }

    fn signals(&self, policy: &ClassPolicy, text: &str) -> SignalBundle {
        SignalBundle::extract(text, &policy.lexicon, self.config.ignored_token_chars)
    }
}

impl Default for ModerationService {
    fn default() -> Self {
        Self::new(
            Lexicon::standard(),
            ModerationConfig::default(),
            ReasonLocale::default(),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
