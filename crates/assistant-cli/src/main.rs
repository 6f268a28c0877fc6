use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use assistant_loop::{run_chat_loop, ChatLoopConfig, LoopOutcome};
use assistant_tools::{builtin_registry, ToolRegistry};
use chat_core::{Config, Message};
use lunchmoney_client::LunchMoneyClient;
use ollama_client::OllamaClient;

#[derive(Parser)]
#[command(name = "assistant-cli")]
#[command(about = "Local finance chat (Ollama + Lunch Money)")]
#[command(version)]
struct Cli {
    /// Ollama base URL
    #[arg(long, env = "OLLAMA_URL")]
    ollama_url: Option<String>,

    /// Model name served by Ollama
    #[arg(long, env = "OLLAMA_MODEL")]
    model: Option<String>,

    /// Months of history assumed when a tool request carries no dates
    #[arg(long, env = "LM_DEFAULT_MONTHS_BACK")]
    months_back: Option<u32>,

    /// Maximum tool invocations per reply
    #[arg(long, default_value_t = assistant_loop::config::DEFAULT_MAX_STEPS)]
    max_steps: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,
    /// Ask a single question and exit
    Ask {
        /// The question, e.g. "Compare Jan-Mar this year vs last year"
        prompt: String,
    },
    /// List the available tools and their argument shapes
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(ollama_url) = cli.ollama_url.clone() {
        config.ollama_url = ollama_url;
    }
    if let Some(model) = cli.model.clone() {
        config.ollama_model = model;
    }
    if let Some(months_back) = cli.months_back {
        config.months_back = months_back;
    }

    let provider = Arc::new(LunchMoneyClient::new(&config)?);
    let registry = builtin_registry(provider);
    let model = OllamaClient::new(&config)?;
    let loop_config = ChatLoopConfig {
        max_steps: cli.max_steps,
        ..ChatLoopConfig::from_config(&config)
    };

    log::info!(
        "model={} tools={}",
        model.model(),
        registry.list_tool_names().len()
    );

    match cli.command {
        Commands::Chat => run_interactive_chat(&model, &registry, &loop_config).await,
        Commands::Ask { prompt } => {
            let mut messages = vec![Message::user(prompt)];
            let outcome = run_chat_loop(&mut messages, &model, &registry, &loop_config).await?;
            print_outcome(&outcome, loop_config.max_steps);
            Ok(())
        }
        Commands::Tools => {
            for name in registry.list_tool_names() {
                if let Some(tool) = registry.get(&name) {
                    println!("{}  {}", name.cyan().bold(), tool.description().dimmed());
                    println!("  args: {}", serde_json::to_string(&tool.args_schema())?);
                }
            }
            Ok(())
        }
    }
}

async fn run_interactive_chat(
    model: &OllamaClient,
    registry: &ToolRegistry,
    loop_config: &ChatLoopConfig,
) -> anyhow::Result<()> {
    println!(
        "{}",
        "Local finance chat. Ask about your spending; ctrl-d to exit.".dimmed()
    );

    // One transcript for the whole session so follow-up questions keep
    // their context. The loop inserts the system turn on the first run.
    let mut messages: Vec<Message> = Vec::new();
    let stdin = io::stdin();

    loop {
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt == "exit" || prompt == "quit" {
            return Ok(());
        }

        messages.push(Message::user(prompt));
        match run_chat_loop(&mut messages, model, registry, loop_config).await {
            Ok(outcome) => print_outcome(&outcome, loop_config.max_steps),
            Err(error) => eprintln!("{} {error}", "error:".red().bold()),
        }
    }
}

fn print_outcome(outcome: &LoopOutcome, max_steps: usize) {
    match &outcome.reply {
        Some(reply) => println!("{reply}"),
        None => {
            println!(
                "{}",
                format!(
                    "I needed more tool steps than allowed (max {max_steps}). Try narrowing the request."
                )
                .yellow()
            );
            if let (Some(tool), Some(result)) = (&outcome.last_tool, &outcome.last_result) {
                let args = outcome
                    .last_args
                    .as_ref()
                    .and_then(|args| serde_json::to_string_pretty(args).ok())
                    .unwrap_or_else(|| "{}".to_string());
                let result = serde_json::to_string_pretty(result)
                    .unwrap_or_else(|_| "null".to_string());
                eprintln!("{}", format!("last tool: {tool}").dimmed());
                eprintln!("{}", format!("args: {args}").dimmed());
                eprintln!("{}", format!("result: {result}").dimmed());
            }
        }
    }
}
