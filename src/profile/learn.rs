use chrono::NaiveDate;

use super::summary::{DEFAULT_SUMMARY_ITEMS, summary_for_prompt};
use super::types::{CandidateUpdates, ProfileCategory, UserProfile, clamp_confidence};
use crate::error::ProfileError;
use crate::llm::{ChatMessage, ChatProvider, MessageRole};

const VALID_STYLES: [&str; 3] = ["light", "balanced", "deep"];

/// Asks the model which facts from a finished interview are worth keeping.
pub struct ProfileLearner<'a> {
    provider: &'a dyn ChatProvider,
    locale: String,
}

impl<'a> ProfileLearner<'a> {
    pub fn new(provider: &'a dyn ChatProvider, locale: &str) -> Self {
        Self {
            provider,
            locale: locale.to_string(),
        }
    }

    pub async fn extract(
        &self,
        conversation: &[ChatMessage],
        date: NaiveDate,
        current: &UserProfile,
    ) -> Result<CandidateUpdates, ProfileError> {
        if conversation.is_empty() {
            return Ok(CandidateUpdates::default());
        }

        let system = t!("learn.system", locale = self.locale.as_str());
        let prompt = self.build_prompt(conversation, date, current);
        let raw = self
            .provider
            .chat(&system, &[ChatMessage::user(prompt)])
            .await
            .map_err(|err| ProfileError::Extraction(format!("{err:#}")))?;

        let mut updates = parse_updates(&raw)?;
        normalize_updates(&mut updates, date);
        tracing::debug!(
            stable_facts = updates.stable_facts.len(),
            ongoing_topics = updates.ongoing_topics.len(),
            conflicts = updates.conflicts.len(),
            "extracted profile candidates"
        );
        Ok(updates)
    }

    fn build_prompt(&self, conversation: &[ChatMessage], date: NaiveDate, current: &UserProfile) -> String {
        let locale = self.locale.as_str();
        let user_label = t!("learn.user_label", locale = locale);
        let assistant_label = t!("learn.assistant_label", locale = locale);

        let mut prompt = String::new();
        prompt.push_str(&t!("learn.intro", locale = locale));
        prompt.push('\n');
        prompt.push_str(&t!("learn.date", locale = locale, date = date.format("%Y-%m-%d")));
        prompt.push_str("\n\n");

        let summary = summary_for_prompt(current, DEFAULT_SUMMARY_ITEMS);
        if !summary.is_empty() {
            prompt.push_str(&t!("learn.current_profile", locale = locale));
            prompt.push('\n');
            prompt.push_str(&summary);
            prompt.push_str("\n\n");
        }

        for message in conversation {
            let label = match message.role {
                MessageRole::User => &user_label,
                MessageRole::Assistant => &assistant_label,
            };
            prompt.push_str(label);
            prompt.push_str(": ");
            prompt.push_str(&message.content);
            prompt.push('\n');
        }
        prompt
    }
}

/// Strip a surrounding Markdown code fence from a model reply.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

fn parse_updates(raw: &str) -> Result<CandidateUpdates, ProfileError> {
    let text = strip_code_fence(raw);
    serde_json::from_str(text).or_else(|first_err| {
        // Tolerate prose around the JSON object.
        match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if end > start => serde_json::from_str(&text[start..=end])
                .map_err(|err| ProfileError::Extraction(format!("invalid learning response: {err}"))),
            _ => Err(ProfileError::Extraction(format!(
                "invalid learning response: {first_err}"
            ))),
        }
    })
}

fn normalize_updates(updates: &mut CandidateUpdates, date: NaiveDate) {
    for category in ProfileCategory::ALL {
        for item in updates.items_mut(category) {
            item.value = item.value.trim().to_string();
            item.confidence = clamp_confidence(item.confidence);
            item.source_date.get_or_insert(date);
        }
    }

    let prefs = &mut updates.preferences;
    for style in [&mut prefs.empathy_style, &mut prefs.question_depth] {
        let normalized = style.trim().to_lowercase();
        *style = if VALID_STYLES.contains(&normalized.as_str()) {
            normalized
        } else {
            String::new()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatFuture;
    use crate::profile::types::{ItemStatus, ProfileItem};
    use std::sync::Mutex;

    struct CannedProvider {
        reply: anyhow::Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn chat<'a>(&'a self, _system: &'a str, messages: &'a [ChatMessage]) -> ChatFuture<'a> {
            Box::pin(async move {
                self.prompts
                    .lock()
                    .unwrap()
                    .push(messages[0].content.clone());
                match &self.reply {
                    Ok(text) => Ok(text.clone()),
                    Err(err) => Err(anyhow::anyhow!("{err}")),
                }
            })
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    fn conversation() -> Vec<ChatMessage> {
        vec![
            ChatMessage::assistant("今日はどんな一日でしたか？"),
            ChatMessage::user("在宅で仕事をして、夜は猫と遊んだ"),
        ]
    }

    #[tokio::test]
    async fn empty_conversation_skips_the_call() {
        let provider = CannedProvider::replying("{}");
        let learner = ProfileLearner::new(&provider, "ja");

        let updates = learner.extract(&[], date(), &UserProfile::new()).await.unwrap();

        assert!(updates.is_empty());
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fenced_reply_is_parsed_and_normalized() {
        let provider = CannedProvider::replying(
            "```json\n{\"stable_facts\":[{\"value\":\" 在宅勤務 \",\"confidence\":0}],\
             \"preferences\":{\"empathy_style\":\"Deep\",\"question_depth\":\"extreme\"}}\n```",
        );
        let learner = ProfileLearner::new(&provider, "ja");

        let updates = learner
            .extract(&conversation(), date(), &UserProfile::new())
            .await
            .unwrap();

        let fact = &updates.stable_facts[0];
        assert_eq!(fact.value, "在宅勤務");
        assert!((fact.confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(fact.status, ItemStatus::Observed);
        assert_eq!(fact.source_date, Some(date()));
        assert_eq!(updates.preferences.empathy_style, "deep");
        assert_eq!(updates.preferences.question_depth, "");
    }

    #[tokio::test]
    async fn prompt_labels_speakers_and_includes_current_profile() {
        let provider = CannedProvider::replying("{}");
        let learner = ProfileLearner::new(&provider, "ja");
        let mut current = UserProfile::new();
        current
            .stable_facts
            .push(ProfileItem::new("猫を飼っている", 0.9, ItemStatus::Confirmed));

        learner.extract(&conversation(), date(), &current).await.unwrap();

        let prompt = provider.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("日付: 2026-02-20"));
        assert!(prompt.contains("インタビュアー: 今日はどんな一日でしたか？"));
        assert!(prompt.contains("ユーザー: 在宅で仕事をして"));
        assert!(prompt.contains("猫を飼っている(0.90)"));
    }

    #[tokio::test]
    async fn prose_around_json_is_tolerated() {
        let provider =
            CannedProvider::replying("抽出結果です: {\"ongoing_topics\":[{\"value\":\"転職\",\"confidence\":0.6,\"status\":\"inferred\"}]} 以上");
        let learner = ProfileLearner::new(&provider, "ja");

        let updates = learner
            .extract(&conversation(), date(), &UserProfile::new())
            .await
            .unwrap();
        assert_eq!(updates.ongoing_topics[0].status, ItemStatus::Inferred);
    }

    #[tokio::test]
    async fn blank_and_null_candidate_fields_take_defaults() {
        let provider = CannedProvider::replying(
            r#"{"stable_facts":[
                {"value":"在宅勤務","confidence":0.7,"status":""},
                {"value":"朝型","confidence":null,"status":null},
                {"value":"猫を飼っている","confidence":0.8,"status":"Inferred","source_date":""},
                {"value":null,"confidence":0.9}
            ],
            "preferences":{"empathy_style":null,"avoid_topics":null},
            "ongoing_topics":null}"#,
        );
        let learner = ProfileLearner::new(&provider, "ja");

        let updates = learner
            .extract(&conversation(), date(), &UserProfile::new())
            .await
            .unwrap();

        let facts = &updates.stable_facts;
        assert_eq!(facts.len(), 4);
        assert_eq!(facts[0].status, ItemStatus::Observed);
        assert!((facts[1].confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(facts[1].status, ItemStatus::Observed);
        assert_eq!(facts[2].status, ItemStatus::Inferred);
        assert_eq!(facts[2].source_date, Some(date()));
        assert_eq!(facts[3].value, "");
        assert!(updates.ongoing_topics.is_empty());
        assert!(updates.preferences.is_empty());
    }

    #[tokio::test]
    async fn conflicts_missing_fields_still_parse() {
        let provider = CannedProvider::replying(
            r#"{"conflicts":[
                {"existing_value":"在宅勤務","incoming_value":"出社中心","confidence":0.7},
                {"category":"stable_facts","existing_value":null,"incoming_value":"早起き","source_date":"","detected_at":""}
            ]}"#,
        );
        let learner = ProfileLearner::new(&provider, "ja");

        let updates = learner
            .extract(&conversation(), date(), &UserProfile::new())
            .await
            .unwrap();

        assert_eq!(updates.conflicts.len(), 2);
        assert_eq!(updates.conflicts[0].category, "");
        assert_eq!(updates.conflicts[1].existing_value, "");
        assert!(updates.conflicts[1].source_date.is_none());
        assert!(updates.conflicts[1].detected_at.is_none());
    }

    #[tokio::test]
    async fn unparsable_reply_is_an_extraction_error() {
        let provider = CannedProvider::replying("no json here");
        let learner = ProfileLearner::new(&provider, "ja");

        let err = learner
            .extract(&conversation(), date(), &UserProfile::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::Extraction(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let provider = CannedProvider {
            reply: Err(anyhow::anyhow!("connection reset")),
            prompts: Mutex::new(Vec::new()),
        };
        let learner = ProfileLearner::new(&provider, "ja");

        let err = learner
            .extract(&conversation(), date(), &UserProfile::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn strip_code_fence_handles_plain_and_tagged_fences() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {} "), "{}");
    }
}
