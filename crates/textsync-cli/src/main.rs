use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use textsync_crdt::{
    CrdtDocument, LoroTextBuffer, ReplicatedText, SyncConfig, Synchronizer, TextEdit,
    load_from_snapshot,
};

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "textsync - keep Loro text documents in step with plain text files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to KDL config file
    #[arg(long, global = true, env = "TEXTSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Log every applied edit
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the text held by a snapshot
    Show {
        /// Snapshot file
        snapshot: PathBuf,
    },
    /// Create a snapshot holding the contents of a text file
    Init {
        /// Text file to load
        text: PathBuf,

        /// Where to write the snapshot
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Bring a snapshot's text in line with a text file
    Apply {
        /// Snapshot file
        snapshot: PathBuf,

        /// Text file holding the new content
        text: PathBuf,

        /// Where to write the updated snapshot (defaults to in place)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the edit between two text files without touching any snapshot
    Diff {
        /// Current text
        old: PathBuf,

        /// New text
        new: PathBuf,
    },
}

fn main() -> Result<()> {
    init_miette()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let sync = Synchronizer::new(config);

    match cli.command {
        Commands::Show { snapshot } => {
            let doc = read_snapshot(&snapshot)?;
            print!("{}", container_text(&doc, sync.config())?);
        }
        Commands::Init { text, out } => {
            let content = std::fs::read_to_string(&text).into_diagnostic()?;
            let doc = LoroTextBuffer::new();
            sync.synchronize(&doc, &content).into_diagnostic()?;
            write_snapshot(&doc, &out)?;
            println!("✓ Wrote {}", out.display());
        }
        Commands::Apply {
            snapshot,
            text,
            out,
        } => {
            let doc = read_snapshot(&snapshot)?;
            let content = std::fs::read_to_string(&text).into_diagnostic()?;

            let edit = sync.synchronize(&doc, &content).into_diagnostic()?;
            println!("{}", describe(edit.as_ref()));

            // An unchanged snapshot is only rewritten when copying elsewhere.
            let in_place = out.is_none();
            let dest = out.unwrap_or(snapshot);
            if edit.is_some() || !in_place {
                write_snapshot(&doc, &dest)?;
                println!("✓ Wrote {}", dest.display());
            }
        }
        Commands::Diff { old, new } => {
            let old = std::fs::read_to_string(&old).into_diagnostic()?;
            let new = std::fs::read_to_string(&new).into_diagnostic()?;
            println!("{}", describe(TextEdit::between(&old, &new).as_ref()));
        }
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<LoroTextBuffer> {
    tracing::debug!("Reading snapshot: {}", path.display());
    let bytes = std::fs::read(path).into_diagnostic()?;
    load_from_snapshot(&bytes)
        .map_err(|e| miette::miette!("Failed to load {}: {}", path.display(), e))
}

fn write_snapshot(doc: &LoroTextBuffer, path: &Path) -> Result<()> {
    let bytes = doc.export_snapshot().into_diagnostic()?;
    std::fs::write(path, bytes).into_diagnostic()
}

fn container_text(doc: &LoroTextBuffer, config: &SyncConfig) -> Result<String> {
    let text = doc
        .text(&config.container)
        .ok_or_else(|| miette::miette!("No text container named {:?}", config.container))?;
    Ok(text.materialize())
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(SyncConfig::default()),
        },
    };

    tracing::debug!("Loading config: {}", path.display());
    let source = std::fs::read_to_string(&path).into_diagnostic()?;
    SyncConfig::from_kdl(&source).into_diagnostic()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("textsync").join("config.kdl"))
}

fn describe(edit: Option<&TextEdit>) -> String {
    match edit {
        None => "No changes".to_string(),
        Some(edit) => format!(
            "@{}: -{} +{} {:?}",
            edit.index,
            edit.delete_len,
            edit.insert_len(),
            edit.insert
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn init_miette() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    Ok(())
}
