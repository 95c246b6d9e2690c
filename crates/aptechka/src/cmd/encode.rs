use aptechka_negotiate::{accepted_label, Negotiator};
use aptechka_record::Record;
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{negotiate_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_outbound, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat, negotiator: &Negotiator) -> CliResult<i32> {
    let input = args.input.read()?;
    let document: serde_json::Value = serde_json::from_slice(&input)
        .map_err(|err| CliError::new(DATA_INVALID, format!("input is not valid JSON: {err}")))?;

    let kind = match args.kind {
        Some(kind) => kind,
        None => negotiator.negotiate(args.entity, args.accept.as_deref()),
    };
    debug!(entity = %args.entity, %kind, "encoding");

    let outbound = match document {
        serde_json::Value::Array(items) => {
            let records = items
                .iter()
                .map(Record::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| negotiate_error("invalid record", err.into()))?;
            negotiator.encode_outbound_list(args.entity, kind, records)
        }
        object => {
            let record =
                Record::from_json(&object).map_err(|err| negotiate_error("invalid record", err.into()))?;
            negotiator.encode_outbound(args.entity, kind, record)
        }
    }
    .map_err(|err| negotiate_error("encode failed", err))?;
    let outbound = match args.kind {
        Some(_) => outbound,
        None => {
            let content_type = accepted_label(args.accept.as_deref(), outbound.kind);
            outbound.with_content_type(content_type)
        }
    };

    print_outbound(&outbound, format);
    Ok(SUCCESS)
}
