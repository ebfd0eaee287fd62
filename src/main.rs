use clap::Parser;

mod config;
mod constants;
mod consumer;
mod error;
mod handlers;
mod logging;
mod prompt;
mod server;
mod streaming;
mod upstream;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = config::Cli::parse();

    setup_logging(&cli.log_level)?;

    let debug_enabled =
        cli.log_level.eq_ignore_ascii_case("debug") || cli.log_level.eq_ignore_ascii_case("trace");
    logging::LogConfig::init(debug_enabled);

    match cli.command {
        config::Command::Serve(serve_config) => {
            config::validate_serve_config(&serve_config)?;
            let relay = server::RelayServer::new(serve_config)?;
            relay.run().await
        }
        config::Command::Cook(cook_config) => consumer::run(cook_config).await,
    }
}

fn setup_logging(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = log_level
        .to_lowercase()
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            let level_str = match record.level() {
                log::Level::Error => "\x1b[1;31merror:\x1b[0m",
                log::Level::Warn => "\x1b[1;33mwarn:\x1b[0m",
                log::Level::Info => "\x1b[1;32minfo:\x1b[0m",
                log::Level::Debug => "\x1b[1;34mdebug:\x1b[0m",
                log::Level::Trace => "\x1b[1;35mtrace:\x1b[0m",
            };
            out.finish(format_args!("{} {}", level_str, message))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
