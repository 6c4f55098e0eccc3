use crate::news::NewsConfig;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_compare_model")]
    pub compare_model: String,

    #[serde(flatten)]
    pub news: NewsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(envy::prefixed("CONSENSIA_").from_env::<AppConfig>()?)
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_compare_model() -> String {
    "gemini-2.5-flash".to_string()
}
