use std::process::exit;
use svggloo::{cli, commands, utils};

fn main() {
    let args = cli::parse_args();
    utils::init_logger(args.verbose);

    if let Err(e) = commands::execute_command(&args) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}
