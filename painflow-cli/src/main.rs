//! painflow: drive the pain-to-agent pipeline from a terminal.
//!
//! Commands:
//!
//!   painflow run "<problem>"     Run every stage against the hosted endpoints
//!   painflow chat "<message>"    Stream one assistant turn
//!   painflow replay <file>       Decode a recorded chat stream

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parking_lot::Mutex;

use painflow::collaborators::{HttpGenerator, LocalDeploymentPrep, WorkflowGenerator};
use painflow::config::PainflowConfig;
use painflow::core::{RunOutcome, StageStatus};
use painflow::events::LoggingEventSink;
use painflow::live::{pump_stream, IntervalScheduler, LiveDeltaStore, LiveSnapshot, PumpSummary};
use painflow::models::{ChatMessage, ChatMode, ChatRequest};
use painflow::observability::init_tracing;
use painflow::pipeline::{WorkflowEngine, WorkflowSnapshot};

const EMPTY_REPLY: &str =
    "No reply received. Check that the chat endpoint is reachable and its model key is configured.";

#[derive(Parser)]
#[command(name = "painflow", about = "Pain-to-agent generation pipeline")]
struct Args {
    /// JSON configuration file
    #[arg(long, global = true, env = "PAINFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the workflow and chat endpoints
    #[arg(long, global = true, env = "PAINFLOW_BASE_URL")]
    base_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline for a problem statement
    Run {
        /// Free-text business problem
        input: String,

        /// Prepare the deployment plan locally instead of calling the endpoint
        #[arg(long)]
        local_deploy: bool,

        /// Pause before each stage's call, in milliseconds
        #[arg(long)]
        stage_delay_ms: Option<u64>,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stream one chat turn
    Chat {
        /// The user's message
        message: String,

        /// Assistant mode
        #[arg(long, default_value = "general")]
        mode: ChatMode,
    },
    /// Decode a recorded chat stream through the live store
    Replay {
        /// File holding the raw stream body
        file: PathBuf,

        /// Bytes fed per chunk
        #[arg(long, default_value_t = 64)]
        chunk_size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PainflowConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PainflowConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.http.base_url.clone_from(base_url);
    }
    if args.log_json {
        config.logging.json = true;
    }
    init_tracing(&config.logging)?;

    match args.command {
        Command::Run {
            input,
            local_deploy,
            stage_delay_ms,
            json,
        } => {
            if let Some(delay) = stage_delay_ms {
                config.workflow.stage_delay_ms = delay;
            }
            run_pipeline(&config, &input, local_deploy, json).await
        }
        Command::Chat { message, mode } => chat(&config, message, mode).await,
        Command::Replay { file, chunk_size } => replay(&config, &file, chunk_size).await,
    }
}

async fn run_pipeline(config: &PainflowConfig, input: &str, local_deploy: bool, json: bool) -> Result<()> {
    let http = HttpGenerator::new(config.http.clone())?;
    let generator: Box<dyn WorkflowGenerator> = if local_deploy {
        Box::new(LocalDeploymentPrep::new(http, config.deployment.clone()))
    } else {
        Box::new(http)
    };
    let generator: Arc<dyn WorkflowGenerator> = Arc::from(generator);

    let engine = WorkflowEngine::builder(generator)
        .with_config(config.workflow.clone())
        .with_event_sink(Arc::new(LoggingEventSink::debug()))
        .build();

    let last: Mutex<Vec<StageStatus>> = Mutex::new(Vec::new());
    let _progress = engine.subscribe(move |snapshot: &Arc<WorkflowSnapshot>| {
        let mut last = last.lock();
        for (index, stage) in snapshot.stages.iter().enumerate() {
            if last.get(index) == Some(&stage.status) {
                continue;
            }
            match stage.status {
                StageStatus::Running => eprintln!("  .. {} ({})", stage.name, stage.id.phase_label()),
                StageStatus::Completed => eprintln!("  ok {}", stage.name),
                StageStatus::Error => eprintln!(
                    "  !! {}: {}",
                    stage.name,
                    stage.error.as_deref().unwrap_or_default()
                ),
                StageStatus::Pending => {}
            }
        }
        *last = snapshot.stages.iter().map(|s| s.status).collect();
    });

    let outcome = engine.start_workflow(input).await;

    if json {
        let report = serde_json::json!({
            "outcome": outcome,
            "state": engine.snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &outcome {
            RunOutcome::Completed => println!("Workflow completed"),
            other => println!("Workflow stopped: {other}"),
        }
    }

    if outcome.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}

fn echo_text(store: &LiveDeltaStore) -> painflow::observe::Subscription {
    let printed = AtomicUsize::new(0);
    store.subscribe(move |snapshot: &Arc<LiveSnapshot>| {
        let from = printed.swap(snapshot.assistant_text.len(), Ordering::SeqCst);
        if let Some(fresh) = snapshot.assistant_text.get(from..) {
            print!("{fresh}");
            let _ = std::io::stdout().flush();
        }
    })
}

fn report(summary: &PumpSummary) {
    println!();
    if summary.is_empty() {
        println!("{EMPTY_REPLY}");
    }
    tracing::info!(
        fragments = summary.fragments,
        characters = summary.characters,
        saw_end_marker = summary.saw_end_marker,
        "Stream finished"
    );
}

async fn chat(config: &PainflowConfig, message: String, mode: ChatMode) -> Result<()> {
    let http = HttpGenerator::new(config.http.clone())?;
    let store = LiveDeltaStore::new(IntervalScheduler::new(config.live.flush_interval())?);
    let _echo = echo_text(&store);

    let request = ChatRequest {
        messages: vec![ChatMessage::user(message)],
        mode,
    };
    let assistant_id = painflow::utils::generate_uuid().to_string();
    store.start(assistant_id, None);

    let body = match http.stream_chat(&request).await {
        Ok(body) => body,
        Err(e) => {
            store.commit();
            return Err(e.into());
        }
    };
    let summary = pump_stream(&store, body).await?;
    report(&summary);

    if !summary.is_empty() && mode.advance() != mode {
        println!("Next mode: {}", mode.advance());
    }
    store.dispose();
    Ok(())
}

async fn replay(config: &PainflowConfig, file: &Path, chunk_size: usize) -> Result<()> {
    let raw = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    let store = LiveDeltaStore::new(IntervalScheduler::new(config.live.flush_interval())?);
    let _echo = echo_text(&store);
    store.start(file.display().to_string(), None);

    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = raw
        .chunks(chunk_size.max(1))
        .map(|chunk| Ok(chunk.to_vec()))
        .collect();
    let summary = pump_stream(&store, futures::stream::iter(chunks)).await?;
    report(&summary);

    println!("{}", serde_json::to_string(&summary)?);
    store.dispose();
    Ok(())
}
