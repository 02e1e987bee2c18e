use crate::cli::InitArgs;
use crate::config::{self, Config, CONFIG_FILE};
use std::error::Error;
use std::fs;

/// Execute initialization of the config with default settings
pub fn execute(args: &InitArgs) -> Result<(), Box<dyn Error>> {
    let config_dir = config::config_dir()?;
    let config_file = config_dir.join(CONFIG_FILE);
    if config_file.exists() && !args.force {
        println!(
            "Config file already exists at {}. Use --force to overwrite.",
            config::display_relative_path(&config_file)
        );
        return Ok(());
    }

    fs::create_dir_all(&config_dir)
        .map_err(|e| format!("Failed to create config folder {:?}: {}", config_dir, e))?;
    config::write_config(&Config::default(), &config_file)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    println!(
        "Configuration file created successfully at {}",
        config::display_relative_path(&config_file)
    );
    Ok(())
}
