use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use playground::{
    ConversationStore, GenerationParameters, InMemoryConversationStore, ModelCatalog,
    OpenAiCompatClient, Role, SubmitTurnUseCase, Turn, DEFAULT_MODEL, SAFETY_MODEL,
};

#[derive(Parser)]
#[command(name = "playground")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct GenerationArgs {
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(short, long, default_value = "1.0")]
    temperature: f32,

    #[arg(long, default_value = "1024")]
    max_tokens: u32,

    #[arg(long, default_value = "0.9")]
    top_p: f32,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Literal string that truncates generation when produced
    #[arg(long, default_value = "")]
    stop: String,

    /// Disable incremental delivery and fetch the full response at once
    #[arg(long)]
    no_stream: bool,

    /// Route the request through the safety classifier instead of the
    /// selected model
    #[arg(long)]
    safety_mode: bool,

    /// Ask the model for a JSON-object response
    #[arg(long)]
    json_mode: bool,
}

impl GenerationArgs {
    fn to_params(&self) -> GenerationParameters {
        GenerationParameters::new(&self.model)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_top_p(self.top_p)
            .with_seed(self.seed)
            .with_stop_sequence(&self.stop)
            .with_stream(!self.no_stream)
            .with_safety_mode(self.safety_mode)
            .with_json_mode(self.json_mode)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session against the completion endpoint
    Chat {
        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Send a single message and print the response
    Once {
        message: String,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// List the selectable models
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Chat { generation } => {
            let (store, use_case) = build_session()?;
            let params = generation.to_params();
            info!("Starting chat session ({})", params.summary());
            run_repl(store, &use_case, &params).await?;
        }

        Commands::Once {
            message,
            generation,
        } => {
            let (_, use_case) = build_session()?;
            let assistant = use_case.execute(&message, &generation.to_params()).await;
            println!("{}", assistant.content());
        }

        Commands::Models => {
            let catalog = model_catalog();
            println!("Selectable models:\n");
            for model in catalog.models() {
                if model == SAFETY_MODEL {
                    println!("  {model}  (safety classifier)");
                } else {
                    println!("  {model}");
                }
            }
        }
    }

    Ok(())
}

fn model_catalog() -> ModelCatalog {
    match std::env::var("PLAYGROUND_MODELS") {
        Ok(list) => ModelCatalog::from_list(&list),
        Err(_) => ModelCatalog::default(),
    }
}

/// Wire one session: an empty transcript plus the orchestrator bound to
/// the HTTP completion client.
fn build_session() -> Result<(Arc<dyn ConversationStore>, SubmitTurnUseCase)> {
    let Some(client) = OpenAiCompatClient::from_env() else {
        bail!("GROQ_API_KEY is not set; export it to reach the completion endpoint");
    };
    let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new());
    let use_case = SubmitTurnUseCase::new(store.clone(), Arc::new(client));
    Ok((store, use_case))
}

/// Read-eval loop: one user action at a time, each running to a terminal
/// outcome before the next prompt. Blank input is suppressed here, before
/// the orchestrator is involved.
async fn run_repl(
    store: Arc<dyn ConversationStore>,
    use_case: &SubmitTurnUseCase,
    params: &GenerationParameters,
) -> Result<()> {
    println!("Type a message and press enter. /history shows the transcript, /quit exits.\n");

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                for turn in store.all_turns().await {
                    print_turn(&turn);
                }
                continue;
            }
            _ => {}
        }

        let assistant = use_case.execute(input, params).await;
        println!("assistant> {}\n", assistant.content());
    }

    Ok(())
}

fn print_turn(turn: &Turn) {
    match turn.role() {
        Role::User => println!("you> {}", turn.content()),
        Role::Assistant => println!("assistant> {}", turn.content()),
    }
}
