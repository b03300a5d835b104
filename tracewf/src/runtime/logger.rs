use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::api::ConvertError;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {level} [{thread}] {target} - {m}{n}";
const ROLL_SIZE: u64 = 50 * 1024 * 1024;
const ROLL_COUNT: u32 = 20;

/// init log4rs
/// level value: ["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"], ignore ascii case
/// log_file: rolling file appender instead of the stderr console
pub fn init_log(level: &str, log_file: Option<&Path>) -> crate::api::Result<()> {
    let default_level = LevelFilter::from_str(level)
        .map_err(|_e| ConvertError::config(format!("can not parse log level `{}`", level)))?;

    let encoder = PatternEncoder::new(PATTERN);
    let (name, appender) = match log_file {
        Some(path) => ("rolling_file", create_rolling_file_appender(encoder, path)?),
        None => ("console", create_console_appender(encoder)),
    };

    let config = Config::builder()
        .appender(Appender::builder().build(name, appender))
        .build(Root::builder().appender(name).build(default_level))
        .map_err(|e| ConvertError::config(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| ConvertError::config(e.to_string()))?;
    Ok(())
}

fn create_console_appender(encoder: PatternEncoder) -> Box<dyn Append> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(encoder))
        .build();
    let appender: Box<dyn Append> = Box::new(stderr);
    appender
}

fn create_rolling_file_appender(
    encoder: PatternEncoder,
    path: &Path,
) -> crate::api::Result<Box<dyn Append>> {
    let roll_path = format!("{}.{{}}", path.display());

    let trigger = SizeTrigger::new(ROLL_SIZE);
    let roll = FixedWindowRoller::builder()
        .base(1)
        .build(roll_path.as_str(), ROLL_COUNT)
        .map_err(|e| ConvertError::config(format!("log roll error: {}", e)))?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roll));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(encoder))
        .append(true)
        .build(path, Box::new(policy))?;
    let appender: Box<dyn Append> = Box::new(rolling_file);
    Ok(appender)
}
