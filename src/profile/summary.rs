use super::types::{ProfileCategory, ProfileItem, UserProfile};

pub const DEFAULT_SUMMARY_ITEMS: usize = 8;
pub const DEFAULT_PENDING_LIMIT: usize = 5;

const SUMMARY_HEADER: &str =
    "以下はこれまでのユーザープロファイルです。既知情報の重複質問は避け、変化点を優先してください。";

fn category_title(category: ProfileCategory) -> &'static str {
    match category {
        ProfileCategory::StableFacts => "継続している事実",
        ProfileCategory::OngoingTopics => "継続トピック",
        ProfileCategory::EffectivePatterns => "有効だった質問傾向",
        ProfileCategory::SensitiveTopics => "慎重に扱う話題",
    }
}

/// Render the profile as a compact prompt section for the interviewer.
///
/// Returns an empty string when there is nothing worth telling the model.
pub fn summary_for_prompt(profile: &UserProfile, max_items: usize) -> String {
    let max_items = if max_items == 0 {
        DEFAULT_SUMMARY_ITEMS
    } else {
        max_items
    };

    let mut lines = Vec::new();
    for category in ProfileCategory::ALL {
        if let Some(line) = items_line(category_title(category), profile.items(category), max_items) {
            lines.push(line);
        }
    }

    if !profile.pending_confirmations.is_empty() {
        let values: Vec<String> = profile
            .pending_confirmations
            .iter()
            .take(max_items)
            .map(|p| format!("{}:{}({:.2})", p.category, p.value, p.confidence))
            .collect();
        lines.push(format!("- 未確認の仮説（確認優先）: {}", values.join(", ")));
    }

    let prefs = &profile.preferences;
    if !prefs.is_empty() {
        let mut parts = Vec::new();
        if !prefs.empathy_style.is_empty() {
            parts.push(format!("共感スタイル={}", prefs.empathy_style));
        }
        if !prefs.question_depth.is_empty() {
            parts.push(format!("質問深度={}", prefs.question_depth));
        }
        if !prefs.avoid_topics.is_empty() {
            parts.push(format!("避ける話題={}", prefs.avoid_topics.join(",")));
        }
        lines.push(format!("- 嗜好: {}", parts.join("; ")));
    }

    if lines.is_empty() {
        return String::new();
    }
    format!("{SUMMARY_HEADER}\n{}", lines.join("\n"))
}

fn items_line(title: &str, items: &[ProfileItem], max_items: usize) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut sorted: Vec<&ProfileItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let values: Vec<String> = sorted
        .into_iter()
        .take(max_items)
        .map(|item| format!("{}({:.2})", item.value, item.confidence))
        .collect();
    Some(format!("- {title}: {}", values.join(", ")))
}

/// The hypotheses a session should try to confirm, oldest first.
pub fn pending_hypotheses(profile: &UserProfile, limit: usize) -> Vec<(String, String)> {
    let limit = if limit == 0 { DEFAULT_PENDING_LIMIT } else { limit };
    profile.pending_confirmations.hypotheses(limit)
}
