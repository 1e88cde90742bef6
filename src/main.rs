//! Thera CLI entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thera")]
#[command(about = "❀ Thera - Terminal AI therapist companion")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Thera configuration
    Onboard,

    /// Talk to the companion
    Chat {
        /// Single message to send instead of an interactive session
        #[arg(short, long)]
        message: Option<String>,

        /// Surface raw model output for diagnostics
        #[arg(long)]
        debug: bool,
    },

    /// Show Thera status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Setup Global Ctrl+C handler
    let exit_flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let r = exit_flag.clone();

    ctrlc::set_handler(move || {
        if r.load(std::sync::atomic::Ordering::SeqCst) {
            println!("\nGoodbye! Take care of yourself.");
            std::process::exit(0);
        } else {
            println!("\nPress Ctrl+C again to exit");
            r.store(true, std::sync::atomic::Ordering::SeqCst);

            // Reset flag after 3 seconds
            let r2 = r.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_secs(3));
                r2.store(false, std::sync::atomic::Ordering::SeqCst);
            });
        }
    })
    .ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Onboard => {
            println!("❀ Initializing Thera...");
            thera::config::onboard()?;
        }

        Commands::Chat { message, debug } => {
            let config = thera::config::load()?;
            let debug = debug || config.debug;

            if let Some(msg) = message {
                run_chat_once(&config, &msg, debug).await?;
            } else {
                run_chat_interactive(&config, debug).await?;
            }
        }

        Commands::Status => {
            let config = thera::config::load()?;
            println!("❀ Thera Status\n");
            println!("Companion: {}", config.companion_name);
            println!("Model: {}", config.model);
            println!(
                "Gemini API: {}",
                if config.gemini_api_key.is_empty() {
                    "not set (run 'thera onboard')"
                } else {
                    "✓"
                }
            );
        }
    }

    Ok(())
}

async fn run_chat_once(config: &thera::config::Config, message: &str, debug: bool) -> Result<()> {
    use thera::agent::{Companion, GeminiClient};

    let client = GeminiClient::new(&config.gemini_api_key, &config.model);
    let mut companion = Companion::new(config.companion_name.as_str(), client, debug);

    let reply = companion.respond(message).await;
    thera::ui::print_reply(companion.name(), &reply);

    Ok(())
}

async fn run_chat_interactive(config: &thera::config::Config, debug: bool) -> Result<()> {
    use indicatif::ProgressBar;
    use std::io::{self, Write};
    use std::time::Duration;
    use thera::agent::{Companion, GeminiClient};

    let client = GeminiClient::new(&config.gemini_api_key, &config.model);
    let mut companion = Companion::new(config.companion_name.as_str(), client, debug);

    thera::ui::print_header(companion.name(), &config.model);
    println!("Type 'exit' or 'quit' to end the conversation");
    println!("Type 'debug on' or 'debug off' to toggle diagnostics");
    println!(
        "\n\x1b[1;36m{}\x1b[0m: Hello! I'm {}, your AI therapist companion. How are you feeling today?",
        companion.name(),
        companion.name()
    );

    loop {
        print!("\n\x1b[1;34mYou\x1b[0m: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Goodbye! Take care of yourself.");
            break;
        }

        if input.eq_ignore_ascii_case("debug on") {
            companion.set_debug(true);
            println!("Debug mode enabled.");
            continue;
        }

        if input.eq_ignore_ascii_case("debug off") {
            companion.set_debug(false);
            println!("Debug mode disabled.");
            continue;
        }

        // Empty input is not skipped: the companion answers it with a
        // gentle prompt without contacting the model.
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("{} is thinking", companion.name()));

        let reply = companion.respond(input).await;

        spinner.finish_and_clear();
        thera::ui::print_reply(companion.name(), &reply);
    }

    Ok(())
}
