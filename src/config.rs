use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::constants::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};

#[derive(Parser, Debug)]
#[command(name = "recipe-relay")]
#[command(about = "streaming relay that turns an ingredient list into a recipe via an LLM completion API")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "log level (off, error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the relay server
    Serve(ServeConfig),
    /// Submit ingredients and stream the generated recipe to stdout
    Cook(CookConfig),
}

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    #[arg(long, default_value = "0.0.0.0:8080", help = "server listen address")]
    pub listen: String,

    #[arg(
        long,
        default_value = "https://api.openai.com",
        help = "upstream completion API base url"
    )]
    pub upstream_url: String,

    #[arg(long, default_value = DEFAULT_MODEL, help = "upstream model identifier")]
    pub model: String,

    #[arg(
        long,
        default_value_t = DEFAULT_TEMPERATURE,
        help = "sampling temperature for recipe generation"
    )]
    pub temperature: f64,

    #[arg(
        long,
        default_value = "60s",
        value_parser = humantime::parse_duration,
        help = "maximum wait between upstream chunks before the stream is aborted"
    )]
    pub stream_idle_timeout: Duration,

    #[arg(
        long,
        default_value = "5m",
        value_parser = humantime::parse_duration,
        help = "wall-clock ceiling for a single recipe stream"
    )]
    pub max_stream_duration: Duration,
}

#[derive(Args, Debug, Clone)]
pub struct CookConfig {
    #[arg(
        long,
        default_value = "http://localhost:8080",
        help = "relay server base url"
    )]
    pub server: String,

    #[arg(required = true, help = "ingredients you have on hand")]
    pub ingredients: Vec<String>,
}

pub fn validate_serve_config(config: &ServeConfig) -> Result<(), String> {
    if config.listen.parse::<std::net::SocketAddr>().is_err() {
        return Err(format!("invalid listen address: {}", config.listen));
    }
    if !config.upstream_url.starts_with("http://") && !config.upstream_url.starts_with("https://") {
        return Err(format!(
            "invalid upstream URL (must start with http:// or https://): {}",
            config.upstream_url
        ));
    }
    if let Err(e) = url::Url::parse(&config.upstream_url) {
        return Err(format!("invalid upstream URL format: {}", e));
    }
    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            config.temperature
        ));
    }
    if config.max_stream_duration < config.stream_idle_timeout {
        return Err(
            "max-stream-duration must not be shorter than stream-idle-timeout".to_string(),
        );
    }
    Ok(())
}
