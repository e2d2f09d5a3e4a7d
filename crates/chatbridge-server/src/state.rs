use chatbridge::providers::configs::OpenRouterConfig;

/// Shared application state: the read-only upstream configuration.
/// Everything per-request lives inside the reply pipeline.
#[derive(Clone)]
pub struct AppState {
    pub openrouter: OpenRouterConfig,
}
