use super::Config;

pub const SUPPORTED_LOCALES: [&str; 2] = ["ja", "en"];
const DEFAULT_LOCALE: &str = "ja";

fn detect_system_locale() -> Option<String> {
    std::env::var("LANG")
        .or_else(|_| std::env::var("LC_MESSAGES"))
        .ok()
        .and_then(|lang| supported(&lang))
}

/// Reduce `"ja_JP.UTF-8"` to `"ja"`, keeping it only if a catalog exists.
fn supported(raw: &str) -> Option<String> {
    let raw = raw.trim().to_lowercase();
    let base = raw.split('.').next().unwrap_or(&raw);
    let lang = base.split(['_', '-']).next().unwrap_or(base);
    SUPPORTED_LOCALES
        .contains(&lang)
        .then(|| lang.to_string())
}

/// Detect locale: `TSUZURI_LANG` env -> config value -> system `LANG` -> `"ja"`.
pub fn detect_locale(config_locale: &str) -> String {
    if let Ok(lang) = std::env::var("TSUZURI_LANG")
        && let Some(lang) = supported(&lang)
    {
        return lang;
    }

    if let Some(lang) = supported(config_locale) {
        return lang;
    }

    detect_system_locale().unwrap_or_else(|| DEFAULT_LOCALE.into())
}

impl Config {
    /// Resolve the locale and make it the process default for `t!`.
    pub fn apply_locale(&self) -> String {
        let locale = detect_locale(&self.locale);
        rust_i18n::set_locale(&locale);
        locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_env::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn detect_locale_uses_expected_priority_order() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _lang = EnvVarGuard::set("LANG", "en_US.UTF-8");
        let _lc = EnvVarGuard::unset("LC_MESSAGES");

        let env_lang = EnvVarGuard::set("TSUZURI_LANG", "ja_JP.UTF-8");
        assert_eq!(detect_locale("en"), "ja");
        drop(env_lang);

        let _env_unset = EnvVarGuard::unset("TSUZURI_LANG");
        assert_eq!(detect_locale("ja"), "ja");
        assert_eq!(detect_locale(""), "en");

        let _lang_unset = EnvVarGuard::unset("LANG");
        assert_eq!(detect_locale(""), "ja");
    }

    #[test]
    fn unsupported_locales_fall_through() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set("TSUZURI_LANG", "fr");
        let _lang = EnvVarGuard::set("LANG", "C.UTF-8");
        let _lc = EnvVarGuard::unset("LC_MESSAGES");

        assert_eq!(detect_locale("de_DE"), "ja");
        assert_eq!(detect_locale("EN-us"), "en");
    }
}
