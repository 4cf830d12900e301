use clap::Parser;
use color_eyre::Result;
use taskdeck::{
    ApiClient, Config, Profile,
    cli::{Cli, Commands, handle_add, init_tracing},
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    // Note: --config option is parsed but not yet used to override config path
    let config = Config::load_with_profile(profile)?;

    // Tracing goes to a log file; the TUI owns the terminal
    let data_dir = taskdeck::utils::get_data_dir(profile)
        .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine data directory"))?;
    init_tracing(&data_dir)?;

    let client = ApiClient::new(&config.api_base_url, config.api_token.clone());

    // Dispatch to appropriate command handler
    match cli.command {
        None | Some(Commands::Tui) => {
            let app = taskdeck::tui::App::new(config, client);
            taskdeck::tui::run_event_loop(app)?;
        }
        Some(Commands::Add {
            title,
            description,
            due,
            priority,
        }) => {
            handle_add(title, description, due, priority, &client)?;
        }
    }

    Ok(())
}
