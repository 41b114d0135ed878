use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::messaging::MessagingProvider;
use crate::services::scheduling::SchedulingApi;

pub struct AppState {
    pub config: AppConfig,
    pub scheduling: Box<dyn SchedulingApi>,
    pub messaging: Box<dyn MessagingProvider>,
    pub llm: Box<dyn LlmProvider>,
}
