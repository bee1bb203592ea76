/// Top-level parsed and validated relay config.
#[derive(Debug, Clone)]
pub struct Config {
    /// Analysis engine connection settings.
    pub engine: EngineConfig,
    /// Environment label (e.g. "development", "production"). Logged at
    /// startup, never used for branching.
    pub environment: String,
}

/// Connection settings for the upstream analysis engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the engine, without a trailing slash. The relay posts
    /// to `{base_url}/analyze` and `{base_url}/analyze-stream`.
    pub base_url: String,
    /// Optional request timeout in milliseconds. Absent means wait
    /// indefinitely, which is the historical behavior of this service.
    pub timeout_ms: Option<u64>,
}
