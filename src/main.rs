use anyhow::Result;
use chrono::Local;
use clap::Parser;

fn main() -> Result<()> {
    let cli = weekdo::cli::Cli::parse();
    let config = weekdo::config::from_cli(&cli)?;
    weekdo::logging::init_tracing(&config, cli.log_filter.clone())?;

    match cli.command.clone() {
        Some(weekdo::cli::CliCommand::Tui) | None => {
            weekdo::tui::run(config)?;
        }
        Some(command) => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            weekdo::commands::execute(&config, command, Local::now().date_naive(), &mut handle)?;
        }
    }

    Ok(())
}
