//! Agent Tripwire CLI - scan text from the command line

use std::io::Read;

use anyhow::Context;
use clap::Parser;

use tripwire_core::Scanner;
use tripwire_detect::SignatureMatcher;

#[derive(Parser)]
#[command(name = "tripwire")]
#[command(about = "Agent Tripwire - Runtime Inspection for Inter-Agent Traffic")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Scan a message and print the verdict as JSON
    Scan {
        /// Text to scan; reads stdin when omitted
        text: Option<String>,

        /// Agent whose input this is
        #[arg(short, long, default_value = "cli")]
        agent: String,

        /// Sending agent; enables the canary leak check
        #[arg(short, long)]
        source_agent: Option<String>,
    },
    /// Print signature corpus statistics
    Corpus,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scan {
            text,
            agent,
            source_agent,
        }) => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("reading text from stdin")?;
                    buffer
                }
            };

            let scanner = Scanner::new().context("building scanner")?;
            let result = scanner.scan(&text, &agent, source_agent.as_deref());
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some(Commands::Corpus) => {
            let matcher = SignatureMatcher::shared().context("building signature corpus")?;
            println!("signature corpus: {} phrases", matcher.corpus_size());
        }
        None => {
            println!("Agent Tripwire - Use --help for commands");
        }
    }

    // The engine observes; it never fails a pipeline over a verdict.
    Ok(())
}
