//! `chandler config` - print the resolved configuration.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use chandler_config::{ConfigSource, load_config};

#[derive(Args, Debug)]
pub struct ConfigArgs {}

pub fn run(config_path: Option<&Path>, _args: ConfigArgs) -> Result<()> {
    let loaded = load_config(config_path)?;

    match &loaded.source {
        ConfigSource::File(path) => println!("# source: {}", path.display()),
        ConfigSource::Defaults => println!("# source: built-in defaults"),
    }
    print!("{}", toml::to_string_pretty(&loaded.config)?);

    Ok(())
}
