use aptechka_negotiate::{Decoded, InboundPayload, Negotiator};

use crate::cmd::DecodeArgs;
use crate::exit::{negotiate_error, CliResult, SUCCESS};
use crate::output::{print_records, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat, negotiator: &Negotiator) -> CliResult<i32> {
    let payload = InboundPayload::from(args.input.read()?);
    let decoded = negotiator
        .decode_response(args.entity, &args.content_type, payload)
        .map_err(|err| negotiate_error("decode failed", err))?;

    let single = matches!(decoded, Decoded::One(_));
    print_records(&decoded.into_records(), single, format);
    Ok(SUCCESS)
}
