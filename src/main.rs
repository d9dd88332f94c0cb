use anyhow::Context;
use simplelog as sl;
use std::process::ExitCode;
use uart_responder::{
    command,
    communication,
    config::{Config, ConfigError},
};

/// Overrides the location of the config file
const CONFIG_ENV: &str = "UART_RESPONDER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e @ ConfigError::Usage(_)) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.log_path);
    log::info!("Starting with {config:?}");

    match run(&config) {
        Ok(()) => {
            log::info!("Connection closed, exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<Config, ConfigError> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    Config::load(path)?.with_args(std::env::args().skip(1))
}

fn init_logging(path: &str) {
    match std::fs::File::create(path) {
        Ok(file) => {
            let _ = sl::WriteLogger::init(sl::LevelFilter::Info, sl::Config::default(), file);
        }
        Err(e) => eprintln!("Could not create log file {path}: {e}"),
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    let connection = communication::open_with_retry(
        &config.retry_policy(),
        &mut stdout,
        || communication::open_serial(&config.uart, config.baudrate),
        std::thread::sleep,
    )
    .with_context(|| format!("Could not open {} at {} baud", config.uart, config.baudrate))?;

    command::run(connection, &mut stdout).context("Command loop stopped")?;
    Ok(())
}
