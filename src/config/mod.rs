//! Configuration module for the gas-meter reader.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the gateway,
//! sampling policy, prompts and resolution, `AppPaths` for the platform
//! config directory, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, GatewayConfig, PromptConfig, ResolveConfig, SamplingConfig, API_KEY_ENV,
};
