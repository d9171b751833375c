use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            ConfigLogic::print(&path, cfg)?;
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
            success(format!("Configuration file {} updated", path.display()));
        }

        if !*print_config && !*edit_config {
            info("Nothing to do: use --print or --edit");
        }
    }

    Ok(())
}
