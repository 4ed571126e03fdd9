use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::Config;
use crate::metrics::{MetricsLog, StatsReport};
use crate::profile::{ProfileStore, UserProfile};
use crate::ui::style;

/// Render `tsuzuri stats` for the window ending on `today`.
pub fn render_stats(config: &Config, locale: &str, days: u32, today: NaiveDate) -> Result<String> {
    let since = StatsReport::window_start(days, today);
    let runs = MetricsLog::new(config.metrics_path())
        .load_since(since)
        .context("Failed to read metrics log")?;
    Ok(StatsReport::build(&runs, days, today).render(locale))
}

/// Render `tsuzuri profile show`: location header plus the stored JSON.
pub fn render_profile(config: &Config, locale: &str) -> Result<String> {
    let store = ProfileStore::new(config.profile_path());
    let loaded = store.load();
    if let Some(err) = loaded.warning {
        return Err(anyhow::Error::new(err).context("Failed to load profile"));
    }

    let mut out = format!(
        "{}\n",
        style::dim(t!(
            "profile.path",
            locale = locale,
            path = store.path().display()
        ))
    );
    if is_blank(&loaded.profile) {
        out.push_str(&t!("profile.empty", locale = locale));
        out.push('\n');
        return Ok(out);
    }
    out.push_str(
        &serde_json::to_string_pretty(&loaded.profile).context("Failed to render profile")?,
    );
    out.push('\n');
    Ok(out)
}

fn is_blank(profile: &UserProfile) -> bool {
    profile.stable_facts.is_empty()
        && profile.ongoing_topics.is_empty()
        && profile.effective_patterns.is_empty()
        && profile.sensitive_topics.is_empty()
        && profile.pending_confirmations.is_empty()
        && profile.conflicts.is_empty()
        && profile.preferences.is_empty()
}
