//! Logger setup.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

/// Initialise log4rs from `config_file`, or log `info` and above to stderr
/// when the file does not exist.
pub fn init_logging(config_file: &str) -> Result<(), Box<dyn Error>> {
    if Path::new(config_file).exists() {
        log4rs::init_file(config_file, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {config_file}: {e}"))?;
        log::debug!("Logging configured from {config_file}");
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S)} {h({l:5})} {t} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    log::warn!("{config_file} not found, logging to stderr");
    Ok(())
}
