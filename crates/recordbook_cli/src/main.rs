//! Demo entry point for the recordbook core.
//!
//! # Responsibility
//! - Drive the to-do, library and contact services end to end.
//! - Persist the contact book to a JSON file and read it back.
//! - Own all terminal output; the core never prints.

use anyhow::Context;
use clap::Parser;
use log::info;
use recordbook_core::{
    core_version, init_logging, ContactService, CoreConfig, IdPolicy, InMemoryCollection,
    JsonFileStore, LibraryService, TodoService,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line options for the demo runner.
#[derive(Parser)]
#[command(name = "recordbook", version)]
struct Cli {
    /// JSON file the contact book is saved to and reloaded from
    #[arg(long)]
    data_file: Option<PathBuf>,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logs go to stderr otherwise
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Keep ids permanent instead of renumbering after deletes
    #[arg(long)]
    stable_ids: bool,
}

impl Cli {
    fn into_config(self) -> CoreConfig {
        let defaults = CoreConfig::default();
        CoreConfig {
            log_level: self.log_level.unwrap_or(defaults.log_level),
            log_dir: self.log_dir,
            data_file: self.data_file.unwrap_or(defaults.data_file),
            id_policy: if self.stable_ids {
                IdPolicy::Stable
            } else {
                IdPolicy::Renumber
            },
        }
    }
}

fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CoreConfig) -> anyhow::Result<()> {
    config.validate().context("invalid configuration")?;
    init_logging(&config.log_level, config.log_dir.as_deref())
        .context("failed to initialize logging")?;
    info!(
        "event=cli_start module=cli status=ok version={} policy={}",
        core_version(),
        config.id_policy.as_str()
    );

    println!("recordbook {}", core_version());
    run_todo_demo(config.id_policy)?;
    run_library_demo(config.id_policy)?;
    run_contact_demo(config)?;
    Ok(())
}

fn run_todo_demo(policy: IdPolicy) -> anyhow::Result<()> {
    println!("\n=== To-Do List ===");
    let mut todo = TodoService::new(InMemoryCollection::with_policy(policy));
    for task in ["Learn Rust", "Build a project", "Write documentation"] {
        let id = todo.add_task(task)?;
        println!("Added task {id}: {task}");
    }
    print_tasks(&todo)?;

    let done = todo.complete_task(1)?;
    println!("Completed task: {}", done.task);

    let removed = todo.delete_task(2)?;
    println!("Deleted task: {}", removed.task);
    if let Err(err) = todo.complete_task(3) {
        println!("{err}");
    }
    print_tasks(&todo)?;
    println!("Pending: {}", todo.pending_count());
    Ok(())
}

fn print_tasks(todo: &TodoService<InMemoryCollection>) -> anyhow::Result<()> {
    let tasks = todo.list_tasks()?;
    if tasks.is_empty() {
        println!("No tasks in the list!");
        return Ok(());
    }
    println!("To-Do List:");
    for task in tasks {
        println!("  {task}");
    }
    Ok(())
}

fn run_library_demo(policy: IdPolicy) -> anyhow::Result<()> {
    println!("\n=== Library ===");
    let mut library = LibraryService::new("City Library", InMemoryCollection::with_policy(policy));
    library.add_book("Python Basics", "John Doe", "123456")?;
    library.add_book("Advanced Python", "Jane Smith", "789012")?;
    print_books(&library)?;

    let borrowed = library.borrow_book("python basics")?;
    println!("Borrowed: {}", borrowed.title);
    if let Err(err) = library.borrow_book("Python Basics") {
        println!("{err}");
    }
    print_books(&library)?;

    let returned = library.return_book("Python Basics")?;
    println!("Returned: {}", returned.title);
    if let Err(err) = library.return_book("Missing Title") {
        println!("{err}");
    }
    Ok(())
}

fn print_books(library: &LibraryService<InMemoryCollection>) -> anyhow::Result<()> {
    println!("Books in {}:", library.name());
    for book in library.list_books()? {
        println!("  - {book}");
    }
    Ok(())
}

fn run_contact_demo(config: &CoreConfig) -> anyhow::Result<()> {
    println!("\n=== Contact Book ===");
    let mut contacts = ContactService::new(InMemoryCollection::with_policy(config.id_policy));
    contacts.add_contact("Alice", "123-456-7890", Some("alice@email.com"))?;
    contacts.add_contact("Bob", "234-567-8901", None)?;
    contacts.update_contact("bob", None, Some("bob@email.com"))?;
    if let Err(err) = contacts.add_contact("Carol", "345-678-9012", Some("carol-at-email")) {
        println!("{err}");
    }

    let store = JsonFileStore::new(&config.data_file);
    contacts
        .save(&store)
        .with_context(|| format!("failed to save contacts to {}", store.path().display()))?;
    println!("Contacts saved to {}", store.path().display());

    let mut reloaded = ContactService::new(InMemoryCollection::new());
    reloaded
        .load(&store)
        .with_context(|| format!("failed to load contacts from {}", store.path().display()))?;
    println!("Contacts loaded from {}:", store.path().display());
    for contact in reloaded.list_contacts()? {
        println!("  {contact}");
    }
    Ok(())
}
