//! Config commands

use anyhow::Result;

use crate::config::Config;
use crate::ConfigCommands;

pub fn handle(action: ConfigCommands, config: &Config, profile: Option<&str>) -> Result<()> {
    match action {
        ConfigCommands::Init => {
            let path = Config::default().save(profile)?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Show => {
            println!("store_dir = {:?}", config.store_dir()?.display().to_string());
            println!("default_format = {:?}", config.default_format.as_deref().unwrap_or("table"));
            println!();
            println!("[engine]");
            print!("{}", toml::to_string_pretty(&config.engine)?);
        }
    }
    Ok(())
}
