mod init;
mod path;
pub mod render;

use crate::cli::{Cli, Commands};
use std::error::Error;

pub fn execute_command(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Some(Commands::Init(args)) => init::execute(args),
        Some(Commands::Path) => path::execute(),
        None => render::execute(&cli.render),
    }
}
