use clap::Parser;
use sellout::{Cli, OutputFormatter, OutputMode, SelloutError, SelloutExport, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let (chain_id, date) = match cli.run_arguments() {
        Ok(arguments) => arguments,
        Err(e) => {
            print_startup_error(&e);
            return 2;
        }
    };

    let app = match SelloutExport::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&app, chain_id, date);
    }

    let report = app.run(chain_id, date);
    app.output_formatter().print_run_report(&report);

    report.outcome.exit_code()
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "sellout.toml".to_string());

    match SelloutExport::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  sellout <CHAIN_ID> <DATE> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(app: &SelloutExport, chain_id: i64, date: i64) -> i32 {
    match app.plan(chain_id, date) {
        Ok(plan) => {
            app.output_formatter().print_dry_run(&plan);
            plan.exit_code()
        }
        Err(e) => {
            app.handle_error(&e);
            1
        }
    }
}

fn print_startup_error(error: &SelloutError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
