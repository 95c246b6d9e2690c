use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use aptechka_negotiate::{ContentKind, Outbound, OutboundBody};
use aptechka_record::{Record, Value};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    content_type: &'a str,
    kind: &'a str,
    parts: usize,
    size: usize,
    /// Text payloads verbatim, binary payloads as hex.
    payload: Vec<String>,
}

pub fn print_outbound(outbound: &Outbound, format: OutputFormat) {
    let parts = payload_parts(&outbound.body);
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                content_type: outbound.content_type(),
                kind: outbound.kind.name(),
                parts: parts.len(),
                size: parts.iter().map(|part| part.len()).sum(),
                payload: parts.iter().map(|part| preview(outbound.kind, part)).collect(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CONTENT-TYPE", "SIZE", "PAYLOAD"]);
            for part in &parts {
                table.add_row(vec![
                    outbound.content_type().to_string(),
                    part.len().to_string(),
                    preview(outbound.kind, part),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for part in &parts {
                println!(
                    "content-type={} size={} payload={}",
                    outbound.content_type(),
                    part.len(),
                    preview(outbound.kind, part)
                );
            }
        }
        OutputFormat::Raw => {
            for part in &parts {
                print_raw(part);
            }
        }
    }
}

pub fn print_records(records: &[Record], single: bool, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            if single {
                if let Some(record) = records.first() {
                    print_json(record);
                    return;
                }
            }
            print_json(&records);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "FIELD", "VALUE"]);
            for (index, record) in records.iter().enumerate() {
                for (key, value) in record.iter() {
                    table.add_row(vec![index.to_string(), key.to_string(), display_value(value)]);
                }
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (index, record) in records.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                for (key, value) in record.iter() {
                    println!("{key}={}", display_value(value));
                }
            }
        }
    }
}

#[derive(Serialize)]
struct NegotiationOutput<'a> {
    entity: &'a str,
    accepted: Vec<&'a str>,
    available: Vec<&'a str>,
    chosen: &'a str,
}

pub fn print_negotiation(
    entity: &str,
    accepted: &[ContentKind],
    available: &[ContentKind],
    chosen: ContentKind,
    format: OutputFormat,
) {
    let labels = |kinds: &[ContentKind]| kinds.iter().map(|kind| kind.label()).collect::<Vec<_>>();
    match format {
        OutputFormat::Json => print_json(&NegotiationOutput {
            entity,
            accepted: labels(accepted),
            available: labels(available),
            chosen: chosen.label(),
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENTITY", "ACCEPTED", "AVAILABLE", "CHOSEN"])
                .add_row(vec![
                    entity.to_string(),
                    labels(accepted).join(", "),
                    labels(available).join(", "),
                    chosen.label().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "entity={entity} accepted=[{}] available=[{}] chosen={}",
                labels(accepted).join(", "),
                labels(available).join(", "),
                chosen.label()
            );
        }
        OutputFormat::Raw => println!("{}", chosen.label()),
    }
}

#[derive(Serialize)]
struct UnitOutput<'a> {
    code: u8,
    unit: &'a str,
}

pub fn print_units(format: OutputFormat) {
    let units: Vec<UnitOutput<'_>> = aptechka_lwp::units::table()
        .map(|(code, unit)| UnitOutput { code, unit })
        .collect();
    match format {
        OutputFormat::Json => print_json(&units),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["CODE", "UNIT"]);
            for unit in &units {
                table.add_row(vec![unit.code.to_string(), unit.unit.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for unit in &units {
                println!("{}\t{}", unit.code, unit.unit);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn payload_parts(body: &OutboundBody) -> Vec<Vec<u8>> {
    match body {
        OutboundBody::Record(record) => vec![json_bytes(&record)],
        OutboundBody::Records(records) => vec![json_bytes(records)],
        OutboundBody::Text(text) => vec![text.as_bytes().to_vec()],
        OutboundBody::Bytes(bytes) => vec![bytes.to_vec()],
        OutboundBody::Batch(buffers) => buffers.iter().map(|bytes| bytes.to_vec()).collect(),
    }
}

fn json_bytes<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

fn preview(kind: ContentKind, payload: &[u8]) -> String {
    if kind == ContentKind::GeneralBinary {
        return hex(payload);
    }
    String::from_utf8_lossy(payload).into_owned()
}

fn hex(data: &[u8]) -> String {
    data.iter().fold(String::with_capacity(data.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

fn display_value(value: &Value) -> String {
    match value.to_json() {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}
