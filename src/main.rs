use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use hazard_watch::cli::{self, App, Cli, Commands};
use hazard_watch::config::AppConfig;
use hazard_watch::error::Result;
use hazard_watch::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    // Dropping the guard flushes buffered file logs, so it lives until exit.
    let _log_guard = logging::init(&config.logging)?;
    let cli = Cli::parse();

    info!("Initializing hazard assessment app...");

    let app = match App::new(&config) {
        Ok(app) => {
            info!("Application initialized successfully.");
            app
        },
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            eprintln!(
                "{}",
                "Error: Failed to initialize application. Check logs.".red()
            );
            return Err(e);
        },
    };

    if let Some(command) = cli.command {
        return app.run_command(command).await.map_err(|e| {
            error!("Command execution failed: {:?}", e);
            e
        });
    }

    run_menu(&app).await
}

async fn run_menu(app: &App) -> Result<()> {
    println!(
        "{}",
        "Welcome to the Hazard Watch CLI!".cyan().bold()
    );

    loop {
        let options = &[
            "Assess Coordinates",
            "Search a Place and Assess It",
            "Check Readings Manually",
            "Show Active Weather Alerts",
            "Show Nearby Fire Detections",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()?
            .unwrap_or(options.len() - 1);

        println!("\n---\n");

        let command_result = match selection {
            0 => match cli::prompt_location() {
                Ok(args) => app.run_command(Commands::Assess(args)).await,
                Err(e) => {
                    println!("{} {}", "Failed to get input:".red(), e);
                    continue;
                },
            },
            1 => search_and_assess(app).await,
            2 => match cli::prompt_check_args() {
                Ok(args) => app.run_command(Commands::Check(args)).await,
                Err(e) => {
                    println!("{} {}", "Failed to get input:".red(), e);
                    continue;
                },
            },
            3 => match cli::prompt_point() {
                Ok(point) => app.run_command(Commands::Alerts(point)).await,
                Err(e) => {
                    println!("{} {}", "Failed to get input:".red(), e);
                    continue;
                },
            },
            4 => match cli::prompt_location() {
                Ok(args) => app.run_command(Commands::Fires(args)).await,
                Err(e) => {
                    println!("{} {}", "Failed to get input:".red(), e);
                    continue;
                },
            },
            5 => {
                println!("{}", "Exiting application. Stay safe!".green());
                break;
            },
            _ => unreachable!(),
        };

        if let Err(e) = command_result {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!("\n---\n");
    }

    Ok(())
}

/// Geocodes a free-text place, lets the user pick among matches, then assesses it.
async fn search_and_assess(app: &App) -> Result<()> {
    let query = cli::prompt_query()?;
    let places = app.search_places(&query).await?;

    let index = match places.len() {
        0 => {
            println!("{} '{}'", "No US place found for".yellow(), query);
            return Ok(());
        },
        1 => 0,
        _ => match cli::choose_place(&places)? {
            Some(index) => index,
            None => return Ok(()),
        },
    };

    app.report_place(&places[index], None, false).await
}
