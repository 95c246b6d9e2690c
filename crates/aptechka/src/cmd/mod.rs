use clap::{Args, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use aptechka_negotiate::{ContentKind, Entity, Negotiator};

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod negotiate;
pub mod units;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode JSON records into a wire representation.
    Encode(EncodeArgs),
    /// Decode a payload into JSON records.
    Decode(DecodeArgs),
    /// Show which representation an Accept header selects.
    Negotiate(NegotiateArgs),
    /// List the unit code table.
    Units,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, negotiator: &Negotiator) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format, negotiator),
        Command::Decode(args) => decode::run(args, format, negotiator),
        Command::Negotiate(args) => negotiate::run(args, format, negotiator),
        Command::Units => units::run(format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Inline payload text.
    #[arg(long, conflicts_with_all = ["file", "hex"])]
    pub data: Option<String>,
    /// Inline payload as hex digits.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file. Without any input flag, stdin is read.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> CliResult<Vec<u8>> {
        if let Some(data) = &self.data {
            return Ok(data.as_bytes().to_vec());
        }
        if let Some(hex) = &self.hex {
            return parse_hex(hex);
        }
        if let Some(path) = &self.file {
            return std::fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
        }
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|err| io_error("failed reading stdin", err))?;
        Ok(buf)
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Entity the records belong to.
    #[arg(long, short = 'e', default_value = "medicine", value_parser = parse_entity)]
    pub entity: Entity,
    /// Target representation (plain, positional, msgpack or a media type).
    #[arg(long, short = 'k', conflicts_with = "accept", value_parser = parse_kind)]
    pub kind: Option<ContentKind>,
    /// Negotiate the representation from an Accept header instead.
    #[arg(long)]
    pub accept: Option<String>,
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Entity the payload belongs to.
    #[arg(long, short = 'e', default_value = "medicine", value_parser = parse_entity)]
    pub entity: Entity,
    /// Declared Content-Type of the payload.
    #[arg(long, short = 't', default_value = "application/json")]
    pub content_type: String,
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct NegotiateArgs {
    /// Entity the response carries.
    #[arg(long, short = 'e', default_value = "medicine", value_parser = parse_entity)]
    pub entity: Entity,
    /// Accept header value. Omitted means no preference.
    #[arg(long)]
    pub accept: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_entity(input: &str) -> Result<Entity, String> {
    input.parse().map_err(|err: aptechka_negotiate::NegotiateError| err.to_string())
}

fn parse_kind(input: &str) -> Result<ContentKind, String> {
    input.parse().map_err(|err: aptechka_negotiate::NegotiateError| err.to_string())
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = input.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "--hex needs an even number of digits"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CliError::new(USAGE, "--hex contains a non-hex digit"))
        })
        .collect()
}
