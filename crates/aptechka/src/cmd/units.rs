use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_units, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_units(format);
    Ok(SUCCESS)
}
