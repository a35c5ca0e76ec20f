use std::{fs::File, io, path::Path, sync::Arc};

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::{Cli, LogMode};

#[derive(Debug, PartialEq, Eq)]
pub enum Verbosity {
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<u8> for Verbosity {
    fn from(v: u8) -> Self {
        match v {
            0 => Verbosity::Warn,
            1 => Verbosity::Info,
            2 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }
}

impl From<Verbosity> for Level {
    fn from(v: Verbosity) -> Self {
        match v {
            Verbosity::Warn => Level::WARN,
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Trace => Level::TRACE,
        }
    }
}

/// Installs the global subscriber described by the CLI flags.
pub fn start(cli: &Cli) -> anyhow::Result<()> {
    log(
        cli.debug.into(),
        cli.log_mode.unwrap_or_default(),
        cli.log_file.as_deref(),
    )
}

/// Logs go to `log_file` when given and to stderr otherwise; stdout is
/// reserved for the JSON output. `RUST_LOG` overrides the verbosity.
pub fn log(verbosity: Verbosity, mode: LogMode, log_file: Option<&Path>) -> anyhow::Result<()> {
    let level: Level = verbosity.into();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let writer = match log_file {
        Some(path) => BoxMakeWriter::new(Arc::new(File::create(path)?)),
        None => BoxMakeWriter::new(io::stderr),
    };

    let registry = Registry::default().with(env_filter);
    match mode {
        LogMode::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_line_number(true)
                    .with_writer(writer),
            )
            .try_init()?,
        LogMode::Full => registry
            .with(fmt::layer().with_line_number(true).with_writer(writer))
            .try_init()?,
        LogMode::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_verbosity_from_count() {
        assert_eq!(Verbosity::from(0), Verbosity::Warn);
        assert_eq!(Verbosity::from(1), Verbosity::Info);
        assert_eq!(Verbosity::from(2), Verbosity::Debug);
        assert_eq!(Verbosity::from(7), Verbosity::Trace);
        assert_eq!(Level::from(Verbosity::Debug), Level::DEBUG);
    }
}
