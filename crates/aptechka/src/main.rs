mod cmd;
mod exit;
mod logging;
mod output;

use aptechka_msgpack::{MsgpackConfig, DEFAULT_MAX_PAYLOAD};
use aptechka_negotiate::{Negotiator, NegotiatorConfig};
use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "aptechka", version, about = "Medicine inventory wire codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Largest MessagePack payload accepted, in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        env = "APTECHKA_MAX_PAYLOAD",
        default_value_t = DEFAULT_MAX_PAYLOAD,
        global = true
    )]
    max_payload: usize,

    /// Fail on trailing bytes after a MessagePack map instead of ignoring them.
    #[arg(long, global = true)]
    no_recover: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn negotiator_config(&self) -> NegotiatorConfig {
        NegotiatorConfig {
            msgpack: MsgpackConfig {
                max_payload_size: self.max_payload,
                recover_trailing_bytes: !self.no_recover,
            },
            ..NegotiatorConfig::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let negotiator = Negotiator::with_config(cli.negotiator_config());
    let result = cmd::run(cli.command, format, &negotiator);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
