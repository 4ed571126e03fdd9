use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) =
            std::env::var("TSUZURI_API_KEY").or_else(|_| std::env::var("ANTHROPIC_API_KEY"))
            && !key.trim().is_empty()
        {
            self.llm.api_key = Some(key.trim().to_string());
        }

        if let Ok(model) = std::env::var("TSUZURI_MODEL")
            && !model.trim().is_empty()
        {
            self.llm.model = Some(model.trim().to_string());
        }

        if let Ok(path) = std::env::var("TSUZURI_PROFILE_PATH")
            && !path.trim().is_empty()
        {
            self.profile.path = path;
        }
    }
}
