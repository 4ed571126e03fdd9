use crate::llm::{ChatMessage, ChatProvider};
use crate::profile::{JudgeMethod, Verdict};

use super::turn::{Hypothesis, parse_judge_response};

const NEGATIVE_TOKENS: [&str; 7] = ["いいえ", "違う", "ちがう", "違います", "not", "no", "そんなことない"];
const POSITIVE_TOKENS: [&str; 7] = ["はい", "そうです", "その通り", "あってます", "合ってます", "yes", "yep"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationVerdict {
    pub verdict: Verdict,
    pub method: JudgeMethod,
    pub reason: String,
}

impl ConfirmationVerdict {
    fn rule(verdict: Verdict, reason: impl Into<String>) -> Self {
        Self {
            verdict,
            method: JudgeMethod::Rule,
            reason: reason.into(),
        }
    }

    pub fn is_decisive(&self) -> bool {
        self.verdict != Verdict::Uncertain
    }
}

/// Token rules only. Negative tokens are checked before positive ones.
pub fn classify_answer(answer: &str) -> ConfirmationVerdict {
    let normalized = answer.trim().to_lowercase();
    if normalized.is_empty() {
        return ConfirmationVerdict::rule(Verdict::Uncertain, "empty answer");
    }

    if let Some(token) = NEGATIVE_TOKENS.iter().find(|t| normalized.contains(*t)) {
        return ConfirmationVerdict::rule(
            Verdict::Denied,
            format!("negative token matched: {token}"),
        );
    }
    if let Some(token) = POSITIVE_TOKENS.iter().find(|t| normalized.contains(*t)) {
        return ConfirmationVerdict::rule(
            Verdict::Confirmed,
            format!("positive token matched: {token}"),
        );
    }

    ConfirmationVerdict::rule(Verdict::Uncertain, "no explicit signal")
}

/// Rule-based classifier that asks the model only when the rules are unsure.
pub struct ConfirmationClassifier<'a> {
    provider: Option<&'a dyn ChatProvider>,
    locale: &'a str,
}

impl<'a> ConfirmationClassifier<'a> {
    pub fn new(provider: Option<&'a dyn ChatProvider>, locale: &'a str) -> Self {
        Self { provider, locale }
    }

    pub async fn classify(
        &self,
        question: &str,
        answer: &str,
        target: &Hypothesis,
    ) -> ConfirmationVerdict {
        let rule = classify_answer(answer);
        if rule.is_decisive() {
            return rule;
        }
        let Some(provider) = self.provider else {
            return rule;
        };

        match self.judge(provider, question, answer, target).await {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(
                    category = %target.category,
                    "confirmation judge failed, keeping rule verdict: {err:#}"
                );
                rule
            }
        }
    }

    async fn judge(
        &self,
        provider: &dyn ChatProvider,
        question: &str,
        answer: &str,
        target: &Hypothesis,
    ) -> anyhow::Result<ConfirmationVerdict> {
        let system = t!("judge.system", locale = self.locale);
        let prompt = t!(
            "judge.user",
            locale = self.locale,
            category = target.category,
            value = target.value,
            question = question,
            answer = answer
        );
        let raw = provider
            .chat(&system, &[ChatMessage::user(prompt.into_owned())])
            .await?;
        let (verdict, reason) = parse_judge_response(&raw)?;
        tracing::debug!(%verdict, "confirmation judged by model");
        Ok(ConfirmationVerdict {
            verdict,
            method: JudgeMethod::Llm,
            reason,
        })
    }
}
