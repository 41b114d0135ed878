use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub admin_token: String,
    pub telegram_bot_token: String,
    pub telegram_webhook_secret: String,
    pub scheduling_api_url: String,
    pub scheduling_api_token: String,
    pub ollama_url: String,
    pub ollama_model: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            telegram_webhook_secret: env::var("TELEGRAM_WEBHOOK_SECRET").unwrap_or_default(),
            scheduling_api_url: env::var("SCHEDULING_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            scheduling_api_token: env::var("SCHEDULING_API_TOKEN").unwrap_or_default(),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
        }
    }
}
