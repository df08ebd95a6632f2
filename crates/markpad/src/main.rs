mod preview;
mod script;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use markpad_config::AppConfig;
use markpad_core::{CodeStore, Editor, InputEvent, Key, MemoryStore, NoticeKind, PreviewSurface};
use markpad_store::RedbStore;

use crate::preview::BrowserPreview;

/// Headless driver for the markpad editor engine.
#[derive(Parser, Debug)]
#[command(name = "markpad", version, about)]
struct Cli {
    /// Config file (defaults to markpad.json next to the executable).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the database and the preview file.
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the highlighted overlay markup of a file.
    Render {
        file: PathBuf,
        /// Prefix every line with its number.
        #[arg(long)]
        gutter: bool,
    },
    /// Load a file, type a key script into it and print the result.
    Replay {
        file: PathBuf,
        /// Keys to type, e.g. `if (x<Right> {<Enter>`.
        #[arg(long)]
        keys: String,
        /// Caret offset to start from (defaults to the end of the file).
        #[arg(long)]
        caret: Option<usize>,
    },
    /// Save a file's content as a snapshot.
    Save {
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// List saved snapshots, newest first.
    List,
    /// Make a snapshot the current code.
    Load { id: i64 },
    /// Delete a snapshot.
    Delete { id: i64 },
    /// Open the current code, or a snapshot, in the browser.
    Preview { id: Option<i64> },
    /// Print the autosaved current code.
    Current,
}

/// Resolved settings shared by all commands.
struct Env {
    config: AppConfig,
    data_dir: PathBuf,
}

impl Env {
    fn load(cli: &Cli) -> Self {
        let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
        let config = AppConfig::load_or_create(&config_path);
        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| config.resolve_data_dir());
        Self { config, data_dir }
    }

    fn open_store(&self) -> Result<RedbStore> {
        RedbStore::open(&self.data_dir, self.config.snapshot_limit)
    }

    fn editor(&self, store: Box<dyn CodeStore>) -> Result<Editor> {
        let preview: Box<dyn PreviewSurface> = Box::new(BrowserPreview::new(&self.data_dir));
        Editor::new(&self.config, store, preview)
    }

    fn persistent_editor(&self) -> Result<Editor> {
        self.editor(Box::new(self.open_store()?))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let env = Env::load(&cli);
    tracing::debug!("Using data directory {}", env.data_dir.display());
    let now = Instant::now();

    match cli.command {
        Command::Render { file, gutter } => {
            let mut editor = env.editor(Box::new(MemoryStore::new(env.config.snapshot_limit)))?;
            editor.load_text(&read_file(&file)?);
            print_overlay(&editor, gutter);
        }
        Command::Replay { file, keys, caret } => {
            let mut editor = env.persistent_editor()?;
            editor.load_text(&read_file(&file)?);
            let start = caret.unwrap_or_else(|| editor.buffer().len_chars());
            editor.set_selection(start, start);
            replay(&mut editor, &keys, now);
            print!("{}", editor.text());
            println!();
            println!("-- {}", editor.caret_position());
            report(&editor)?;
        }
        Command::Save { file, title } => {
            let mut editor = env.persistent_editor()?;
            editor.load_text(&read_file(&file)?);
            if let Some(snapshot) = editor.save_snapshot(title.as_deref(), now) {
                println!("{}", snapshot.id);
            }
            report(&editor)?;
        }
        Command::List => {
            let store = env.open_store()?;
            let list = store.list_snapshots()?;
            if list.is_empty() {
                println!("No saved snapshots");
            }
            for snapshot in &list {
                println!(
                    "{}  {}  {}\n    {}",
                    snapshot.id,
                    snapshot.timestamp,
                    snapshot.title,
                    snapshot.preview_line()
                );
            }
        }
        Command::Load { id } => {
            let mut editor = env.persistent_editor()?;
            let loaded = editor.load_snapshot(id, now);
            report(&editor)?;
            if !loaded {
                bail!("Snapshot {id} not found");
            }
        }
        Command::Delete { id } => {
            let mut editor = env.persistent_editor()?;
            let deleted = editor.delete_snapshot(id, now).is_some();
            report(&editor)?;
            if !deleted {
                bail!("Snapshot {id} not found");
            }
        }
        Command::Preview { id } => {
            let mut editor = env.persistent_editor()?;
            editor.restore(now);
            match id {
                Some(id) => {
                    if !editor.preview_snapshot(id, now) {
                        bail!("Snapshot {id} not found");
                    }
                }
                None => editor.preview(now),
            }
            report(&editor)?;
        }
        Command::Current => {
            let store = env.open_store()?;
            match store.load_current()? {
                Some(code) => print!("{code}"),
                None => println!("No current code"),
            }
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Types the key script into `editor`, applying native behavior for keys
/// the editor leaves to the host. Pending autosave is written before returning.
fn replay(editor: &mut Editor, keys: &str, now: Instant) {
    for event in script::parse(keys) {
        if !editor.handle_key(event, now) {
            match event.key {
                Key::Backspace => editor.handle_input(InputEvent::DeleteBackward, now),
                Key::Delete => editor.handle_input(InputEvent::DeleteForward, now),
                Key::Left => editor.move_left(),
                Key::Right => editor.move_right(),
                Key::Char(c) => editor.handle_input(InputEvent::Text(c.to_string()), now),
                Key::Tab | Key::Enter | Key::Other => {}
            }
        }
        editor.run_deferred();
    }
    editor.flush(now);
}

fn print_overlay(editor: &Editor, gutter: bool) {
    if !gutter {
        println!("{}", editor.overlay());
        return;
    }
    let width = editor.line_count().to_string().len();
    for (number, line) in editor.gutter().lines().zip(editor.overlay().split('\n')) {
        println!("{number:>width$} | {line}");
    }
}

/// Prints the last notice; an error notice fails the command.
fn report(editor: &Editor) -> Result<()> {
    match editor.last_notice() {
        Some(notice) if notice.kind == NoticeKind::Error => bail!("{}", notice.message),
        Some(notice) => {
            eprintln!("{}", notice.message);
            Ok(())
        }
        None => Ok(()),
    }
}
