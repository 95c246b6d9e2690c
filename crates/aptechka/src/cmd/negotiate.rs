use aptechka_negotiate::{select_for_response, Negotiator};

use crate::cmd::NegotiateArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_negotiation, OutputFormat};

pub fn run(args: NegotiateArgs, format: OutputFormat, negotiator: &Negotiator) -> CliResult<i32> {
    let accepted = negotiator.accepted(args.accept.as_deref());
    let available = args.entity.available();
    let chosen = select_for_response(&accepted, available);
    print_negotiation(args.entity.name(), &accepted, available, chosen, format);
    Ok(SUCCESS)
}
