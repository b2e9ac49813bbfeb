//! Folio command-line tool.
//!
//! Works on document files (snapshot JSON, draft arrays, or plain text) and
//! a local SQLite store for saved documents and history.
//!
//! Usage:
//!   folio paginate contract.json
//!   folio export contract.json --format paged
//!   folio ask contract.json "Draft a termination clause" --reply reply.json --accept
//!   folio analyze contract.json --reply risks.json
//!
//! Assistant commands replay a reply file instead of calling a hosted model.

mod config;
mod document;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use folio_assist::{AssistOutcome, Assistant, ScriptedCollaborator, StandardClause};
use folio_doc::{
    BlockSnapshot, DocumentSession, Suggestion, SuggestionTarget, TypedId, export, preview,
    resolve_prefix,
};
use folio_store::{DocumentRepository, History, HistoryItem, HistoryKind, SqliteKv};

use crate::config::EditorConfig;

/// Paginated block document toolkit.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Paginate, export, and revise block documents")]
struct Args {
    /// Config file (RON). Defaults to the platform config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how a document breaks into pages
    Paginate {
        file: PathBuf,
    },

    /// Render a document as text
    Export {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Apply a suggestion payload to a document
    Apply {
        file: PathBuf,
        /// File holding the replacement text or drafted blocks
        #[arg(long)]
        payload: PathBuf,
        /// Replace this block's content
        #[arg(long, conflicts_with = "after")]
        replace: Option<String>,
        /// Insert after this block (default: the last block)
        #[arg(long)]
        after: Option<String>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Ask the assistant, replaying a recorded reply
    Ask {
        file: PathBuf,
        instruction: String,
        /// Recorded collaborator reply
        #[arg(long)]
        reply: PathBuf,
        /// Block to edit
        #[arg(long)]
        target: Option<String>,
        /// Accept the resulting suggestion and write the document
        #[arg(long)]
        accept: bool,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Annotate risks from a recorded audit reply
    Analyze {
        file: PathBuf,
        /// Recorded collaborator reply (JSON array of findings)
        #[arg(long)]
        reply: PathBuf,
    },

    /// List the standard clause library
    Clauses,

    /// Save a document to the local store
    Save {
        file: PathBuf,
    },

    /// Load a saved document by id (or unique id prefix)
    Open {
        id: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show or clear recent items
    History {
        #[arg(long)]
        clear: bool,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Text,
    Markdown,
    Paged,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries command output
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = EditorConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Paginate { file } => paginate(&config, &file),
        Command::Export { file, format, out } => export_document(&config, &file, format, out.as_deref()),
        Command::Apply {
            file,
            payload,
            replace,
            after,
            out,
        } => apply(&file, &payload, replace.as_deref(), after.as_deref(), out.as_deref()),
        Command::Ask {
            file,
            instruction,
            reply,
            target,
            accept,
            out,
        } => {
            ask(
                &config,
                &file,
                &instruction,
                &reply,
                target.as_deref(),
                accept,
                out.as_deref(),
            )
            .await
        }
        Command::Analyze { file, reply } => analyze(&config, &file, &reply).await,
        Command::Clauses => {
            for clause in StandardClause::all() {
                println!("{clause}: {}", clause.instruction());
            }
            Ok(())
        }
        Command::Save { file } => save(&config, &file),
        Command::Open { id, out } => open(&config, &id, out.as_deref()),
        Command::History { clear } => history(&config, clear),
        Command::Config => {
            println!("{}", config.to_ron()?);
            Ok(())
        }
    }
}

fn session_for(config: &EditorConfig, file: &Path) -> Result<DocumentSession> {
    let store = document::load(file)?;
    Ok(DocumentSession::with_store(store).with_page_config(config.pagination.clone()))
}

fn snippet(block: &BlockSnapshot) -> String {
    let mut text: String = block.content.chars().take(60).collect();
    if block.char_len() > 60 {
        text.push('…');
    }
    text
}

fn paginate(config: &EditorConfig, file: &Path) -> Result<()> {
    let session = session_for(config, file)?;
    for page in session.pages() {
        let overfull = if page.is_overfull(session.page_config()) {
            " overfull"
        } else {
            ""
        };
        println!("Page {} (cost {}{overfull})", page.number, page.cost);
        for block in page.blocks {
            println!("  [{}] {:<2} {}", block.id.to_ref(), block.kind.as_str(), snippet(block));
        }
    }
    Ok(())
}

fn export_document(
    config: &EditorConfig,
    file: &Path,
    format: ExportFormat,
    out: Option<&Path>,
) -> Result<()> {
    let session = session_for(config, file)?;
    let text = match format {
        ExportFormat::Text => export::plain_text(session.store().blocks()),
        ExportFormat::Markdown => export::markdown(session.store().blocks()),
        ExportFormat::Paged => export::paged_text(&session.pages()),
    };
    document::emit(&text, out)
}

fn apply(
    file: &Path,
    payload: &Path,
    replace: Option<&str>,
    after: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let mut session = DocumentSession::with_store(document::load(file)?);
    let payload = std::fs::read_to_string(payload)
        .with_context(|| format!("failed to read {}", payload.display()))?;

    let suggestion = match (replace, after) {
        (Some(reference), _) => {
            let block = document::resolve_ref(session.store(), reference)?;
            let original = session.store().get(&block).map(|b| b.content.clone());
            Suggestion::replace(block, payload.trim(), original)
        }
        (None, Some(reference)) => {
            Suggestion::insertion(document::resolve_ref(session.store(), reference)?, payload)
        }
        (None, None) => Suggestion::insertion(session.insertion_anchor(), payload),
    };

    let id = suggestion.id;
    session.propose(suggestion);
    let applied = session.accept(&id)?;
    if let Some(applied) = applied {
        tracing::info!(focus = %applied.focus, inserted = applied.inserted.len(), "applied suggestion");
    }
    document::write(&session.snapshot(), out)
}

async fn ask(
    config: &EditorConfig,
    file: &Path,
    instruction: &str,
    reply: &Path,
    target: Option<&str>,
    accept: bool,
    out: Option<&Path>,
) -> Result<()> {
    let mut session = session_for(config, file)?;
    let reply = std::fs::read_to_string(reply)
        .with_context(|| format!("failed to read {}", reply.display()))?;

    let target = target
        .map(|r| document::resolve_ref(session.store(), r))
        .transpose()?;

    let collaborator = Arc::new(ScriptedCollaborator::with_replies([reply]));
    let assistant = Assistant::new(collaborator, config.assist.clone())?;
    let outcome = assistant.ask(&session, instruction, target).await?;

    eprintln!("{}", outcome.message());
    let suggestion = match outcome {
        AssistOutcome::Reply(text) => {
            println!("{text}");
            return Ok(());
        }
        AssistOutcome::Suggestion(suggestion) => suggestion,
    };

    if !accept {
        match suggestion.target {
            SuggestionTarget::Replace(block) => {
                println!("[{}] {}", block.to_ref(), suggestion.payload);
            }
            SuggestionTarget::InsertAfter(anchor) => {
                println!("after [{}]:", anchor.to_ref());
                for draft in preview(&suggestion.payload) {
                    println!("  {:<2} {}", draft.kind.as_str(), draft.content);
                }
            }
        }
        return Ok(());
    }

    let id = suggestion.id;
    session.propose(suggestion);
    session.accept(&id)?;
    document::write(&session.snapshot(), out)
}

async fn analyze(config: &EditorConfig, file: &Path, reply: &Path) -> Result<()> {
    let mut session = session_for(config, file)?;
    let reply = std::fs::read_to_string(reply)
        .with_context(|| format!("failed to read {}", reply.display()))?;

    let collaborator = Arc::new(ScriptedCollaborator::with_replies([reply]));
    let assistant = Assistant::new(collaborator, config.assist.clone())?;
    let findings = assistant.analyze_risks(session.store().blocks()).await?;
    session.apply_risks(findings);

    for entry in session.risks().findings() {
        let location = match entry.block {
            Some(block) => format!("[{}]", block.to_ref()),
            None => "general".to_string(),
        };
        println!(
            "{:<6} {location}: {} - {}",
            entry.finding.severity.as_str(), entry.finding.title, entry.finding.description
        );
    }

    for block in session.blocks() {
        if let Some(level) = block.risk_level {
            println!("  {:<6} [{}] {}", level.as_str(), block.id.to_ref(), snippet(&block));
        }
    }
    Ok(())
}

fn open_db(config: &EditorConfig) -> Result<SqliteKv> {
    let Some(path) = config.database_path() else {
        bail!("no data directory available; set `database` in the config");
    };
    SqliteKv::open(&path).with_context(|| format!("failed to open {}", path.display()))
}

fn save(config: &EditorConfig, file: &Path) -> Result<()> {
    let kv = open_db(config)?;
    let store = document::load(file)?;
    let snapshot = store.snapshot();

    let stored = DocumentRepository::new(&kv).save(&snapshot)?;
    let item = HistoryItem::new(
        snapshot.document_id.to_string(),
        HistoryKind::Doc,
        export::plain_text(store.blocks()),
    );
    History::new(&kv).add(item)?;

    println!("{} {}", snapshot.document_id, stored.title);
    Ok(())
}

fn open(config: &EditorConfig, query: &str, out: Option<&Path>) -> Result<()> {
    let kv = open_db(config)?;
    let repo = DocumentRepository::new(&kv);
    let id = resolve_prefix(repo.list()?.into_iter(), query)?;
    let stored = repo
        .load(id)?
        .with_context(|| format!("document {} vanished", id.short()))?;
    document::write(&stored.snapshot, out)
}

fn history(config: &EditorConfig, clear: bool) -> Result<()> {
    let kv = open_db(config)?;
    let history = History::new(&kv);
    if clear {
        history.clear()?;
        return Ok(());
    }
    for item in history.all()? {
        println!("{} {:?} {}", item.date, item.kind, item.summary.replace('\n', " "));
    }
    Ok(())
}
