pub mod commands;

use std::io::{self, Write};
use std::path::Path;

use crate::backend::{models::UploadRoute, BackendClient};
use crate::chat::{DropZone, Orchestrator, Role, StagedFile};
use crate::cli::commands::{Commands, FileAction};
use crate::config::AppConfig;
use crate::relay::UploadStore;

pub async fn run_cli(command: Commands, config_path: String) {
    let config = match AppConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    match command {
        Commands::Serve => {
            eprintln!("Serve is handled by the server entrypoint");
        }
        Commands::Chat => run_repl(config).await,
        Commands::Files { action } => run_files(action, &config).await,
        Commands::Uploads => {
            let store = UploadStore::from_config(&config.uploads);
            let records = store.list().await;
            if records.is_empty() {
                println!("No uploads recorded.");
                return;
            }
            println!("{:<42} | {:<25} | {:<12} | {}", "Stored As", "Uploaded At", "Topic", "Name");
            println!("{:-<42}-+-{:-<25}-+-{:-<12}-+-{:-<20}", "", "", "", "");
            for r in records {
                println!(
                    "{:<42} | {:<25} | {:<12} | {}",
                    r.stored_as,
                    r.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    r.topic,
                    r.name
                );
            }
        }
    }
}

async fn run_files(action: FileAction, config: &AppConfig) {
    let backend = BackendClient::from_config(&config.backend);

    match action {
        FileAction::List => match backend.list_files().await {
            Ok(list) if list.files.is_empty() => println!("No files uploaded yet."),
            Ok(list) => {
                for file in list.files {
                    println!("{}", file.filename());
                }
            }
            Err(e) => eprintln!("Failed to fetch files: {}", e),
        },
        FileAction::Delete { filename } => match backend.delete_file(&filename).await {
            Ok(()) => println!("Deleted {}", filename),
            Err(e) => eprintln!("Failed to delete file: {}", e),
        },
        FileAction::Upload { path } => {
            let file = match read_staged(&path).await {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Cannot read {}: {}", path.display(), e);
                    return;
                }
            };
            match backend.upload(UploadRoute::UploadPdf, &file.name, &file.bytes).await {
                Ok(_) => println!("Upload successful!"),
                Err(e) => eprintln!("Upload failed: {}", e),
            }
        }
    }
}

async fn read_staged(path: &Path) -> io::Result<StagedFile> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(StagedFile::new(name, bytes))
}

fn render_for_terminal(content: &str) -> String {
    content.replace("<br>", "\n")
}

async fn run_repl(config: AppConfig) {
    let orchestrator = Orchestrator::from_config(&config);
    let store = orchestrator.store().clone();
    let mut session = store.create();
    let mut drop_zone = DropZone::new();
    let mut staged: Option<StagedFile> = None;

    println!("--- PNWER AI Terminal Chat ---");
    println!("Commands: /attach <path>, /detach, /new, /sessions, /exit");
    println!("------------------------------");
    println!("\nPNWER AI> {}", session.messages[0].content);

    loop {
        match &staged {
            Some(file) => print!("\n[{}] User> ", file.name),
            None => print!("\nUser> "),
        }
        let _ = io::stdout().flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }
        let text = input.trim();

        if text.is_empty() { continue; }
        if text == "/exit" || text == "/quit" { break; }

        if text == "/new" {
            session = store.create();
            staged = None;
            println!("Started session {}", session.id);
            println!("\nPNWER AI> {}", session.messages[0].content);
            continue;
        }

        if text == "/sessions" {
            for s in store.list() {
                let marker = if s.id == session.id { "*" } else { " " };
                let title = if s.title.is_empty() { "New Chat" } else { s.title.as_str() };
                println!("{} {} ({} messages) {}", marker, s.id, s.message_count, title);
            }
            continue;
        }

        if text == "/detach" {
            staged = None;
            println!("Attachment removed.");
            continue;
        }

        if let Some(rest) = text.strip_prefix("/attach") {
            drop_zone.drag_enter();
            let dropped = drop_zone.drop_files(rest.split_whitespace().map(str::to_string));
            let Some(path) = dropped else {
                println!("Usage: /attach <path>");
                continue;
            };
            match read_staged(Path::new(&path)).await {
                Ok(file) => {
                    println!("Attached {} ({} bytes)", file.name, file.bytes.len());
                    orchestrator.preview_spreadsheet(&file).await;
                    staged = Some(file);
                }
                Err(e) => eprintln!("Cannot read {}: {}", path, e),
            }
            continue;
        }

        println!("PNWER AI is typing...");
        match orchestrator.send(session.id, text, staged.take()).await {
            Ok(outcome) => {
                for message in outcome.appended.iter().filter(|m| m.role == Role::Assistant) {
                    println!("\nPNWER AI> {}", render_for_terminal(&message.content));
                }
                if let Some(title) = outcome.title {
                    println!("(session titled: {})", title);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
