mod commands;
mod terminal;

use commands::{CommandLine, export};
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.log_level())?;
    print::banner();

    let cfg = commands.into_config()?;
    let result = export::export(&cfg);

    print::end_of_program();
    result
}
