//! SlideKit command-line entry point.
//!
//! Loads a deck, applies a batch of editor commands and writes the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use slidekit_core::{
    Deck, Editor, EditorCommand, EditorConfig, FileStore, MemoryStore, SnapshotStore,
};

/// Apply editor commands to a slide deck
#[derive(Parser, Debug)]
#[command(name = "slidekit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Deck JSON file
    #[arg(value_name = "DECK")]
    deck: PathBuf,

    /// A command as JSON, e.g. '{"command":"align","args":"left"}'. Repeatable.
    #[arg(short, long = "command", value_name = "JSON")]
    commands: Vec<String>,

    /// JSON file holding an array of commands, run before any --command
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Editor config JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Persist history snapshots in this directory
    #[arg(long, value_name = "DIR", conflicts_with = "persist")]
    history_dir: Option<PathBuf>,

    /// Persist history snapshots in the default data directory
    #[arg(long)]
    persist: bool,

    /// Write the resulting deck here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let deck = load_deck(&args.deck)?;
    let commands = load_commands(args.script.as_deref(), &args.commands)?;
    log::info!("applying {} command(s) to {}", commands.len(), args.deck.display());

    let deck = if let Some(dir) = &args.history_dir {
        let store = FileStore::new(dir.clone())?;
        pollster::block_on(run(Editor::new(deck, store, config), commands))?
    } else if args.persist {
        let store = FileStore::default_location()?;
        log::info!("history stored in {}", store.base_path().display());
        pollster::block_on(run(Editor::new(deck, store, config), commands))?
    } else {
        pollster::block_on(run(Editor::new(deck, MemoryStore::new(), config), commands))?
    };

    let json = serde_json::to_string_pretty(&deck)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn load_deck(path: &Path) -> Result<Deck> {
    let json = fs::read_to_string(path).with_context(|| format!("reading deck {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing deck {}", path.display()))
}

fn load_commands(script: Option<&Path>, inline: &[String]) -> Result<Vec<EditorCommand>> {
    let mut commands = Vec::new();
    if let Some(path) = script {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let parsed: Vec<EditorCommand> = serde_json::from_str(&json)
            .with_context(|| format!("parsing script {}", path.display()))?;
        commands.extend(parsed);
    }
    for (i, json) in inline.iter().enumerate() {
        let command = serde_json::from_str(json)
            .with_context(|| format!("parsing --command #{}: {}", i + 1, json))?;
        commands.push(command);
    }
    Ok(commands)
}

/// Run every command, letting each one settle so it gets its own history entry.
async fn run<S: SnapshotStore>(mut editor: Editor<S>, commands: Vec<EditorCommand>) -> Result<Deck> {
    editor.init().await?;

    let config = editor.config();
    let step = Duration::from_millis(config.record_debounce_ms.max(config.undo_throttle_ms));
    let mut now = Instant::now();

    for command in commands {
        let label = format!("{:?}", command);
        let changed = editor.execute(command, now).await?;
        now += step;
        editor.tick(now).await?;
        log::info!("{} -> {}", label, if changed { "changed" } else { "no change" });
    }
    editor.flush().await?;
    log::info!(
        "history: {} snapshot(s), cursor {:?}",
        editor.history().len(),
        editor.history().cursor()
    );
    Ok(editor.into_deck())
}
