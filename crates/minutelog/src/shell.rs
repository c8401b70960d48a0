// SPDX-FileCopyrightText: 2026 Minutelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `minutelog shell` command implementation.
//!
//! Launches an interactive REPL with readline history: one invocation is one
//! session. Login reads the directory through the cache, staging is local,
//! and `commit` drives the batch pipeline with a live progress bar.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use colored::Colorize;
use indicatif::ProgressBar;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use minutelog_cache::ReadCache;
use minutelog_commit::{CommitOutcome, CommitPipeline, HaltReason};
use minutelog_config::model::MinutelogConfig;
use minutelog_core::types::DATE_FORMAT;
use minutelog_core::{
    Attachment, AttachmentRelay, MinutelogError, RelayError, TabularStore,
};
use minutelog_relay::RelayClient;
use minutelog_session::{Directory, Session};
use minutelog_store::JsonlStore;

use crate::board;

/// Stand-in relay used when `relay.endpoint` is unset. `attach` refuses to
/// stage in that case, so this only fires if a cart somehow carries an
/// attachment anyway -- the upload then degrades like any other relay error.
struct DisabledRelay;

#[async_trait]
impl AttachmentRelay for DisabledRelay {
    async fn upload(&self, _: &[u8], _: &str, _: &str) -> Result<String, RelayError> {
        Err(RelayError::Application {
            message: "relay.endpoint is not configured".into(),
        })
    }
}

/// Runs the `minutelog shell` interactive REPL.
pub async fn run_shell(config: MinutelogConfig) -> Result<(), MinutelogError> {
    let store: Arc<dyn TabularStore> = Arc::new(JsonlStore::new(&config.store));
    let cache = Arc::new(ReadCache::new(store.clone(), &config.store, &config.cache));

    let relay: Arc<dyn AttachmentRelay> = if config.relay.endpoint.is_some() {
        Arc::new(RelayClient::new(&config.relay)?)
    } else {
        Arc::new(DisabledRelay)
    };
    let relay_configured = config.relay.endpoint.is_some();

    let pipeline = CommitPipeline::new(store, relay, cache.clone(), &config.store);

    let mut rl = DefaultEditor::new()
        .map_err(|e| MinutelogError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "minutelog shell".bold().green());
    println!("Type {} for commands, {} to exit.\n", "help".yellow(), "quit".yellow());

    let mut session: Option<Session> = None;

    loop {
        let prompt = match &session {
            Some(s) => format!(
                "{}> ",
                format!("{}/{}", s.identity().department, s.identity().group).green()
            ),
            None => format!("{}> ", "minutelog".green()),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let (command, rest) = match trimmed.split_once(' ') {
                    Some((c, r)) => (c, r.trim()),
                    None => (trimmed, ""),
                };

                match command {
                    "quit" | "exit" => break,
                    "help" => print_help(),
                    "login" => match handle_login(&mut rl, &cache).await {
                        Ok(s) => {
                            println!("logged in as {}/{}", s.identity().department, s.identity().group);
                            session = Some(s);
                        }
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    },
                    "logout" => match session.take() {
                        Some(s) => {
                            s.logout();
                            println!("logged out");
                        }
                        None => println!("not logged in"),
                    },
                    "board" => {
                        let date = if rest.is_empty() {
                            None
                        } else {
                            match NaiveDate::parse_from_str(rest, DATE_FORMAT) {
                                Ok(d) => Some(d),
                                Err(_) => {
                                    eprintln!("{}: usage: board [YYYY-MM-DD]", "error".red());
                                    continue;
                                }
                            }
                        };
                        match cache.get().await {
                            Ok(snapshot) => print!("{}", board::render_board(&snapshot.records, date)),
                            Err(e) => eprintln!("{}: {e}", "error".red()),
                        }
                    }
                    "refresh" => {
                        cache.invalidate().await;
                        println!("cache invalidated; the next read fetches fresh data");
                    }
                    "stage" | "attach" | "cart" | "discard" | "commit" => {
                        let Some(session) = session.as_mut() else {
                            println!("login first");
                            continue;
                        };
                        let result = match command {
                            "stage" => handle_stage(session, rest),
                            "attach" => handle_attach(session, rest, relay_configured),
                            "cart" => {
                                print_cart(session);
                                Ok(())
                            }
                            "discard" => {
                                session.cart_mut().discard_all();
                                println!("cart cleared");
                                Ok(())
                            }
                            "commit" => handle_commit(session, rest, &pipeline).await,
                            _ => unreachable!(),
                        };
                        if let Err(e) = result {
                            eprintln!("{}: {e}", "error".red());
                        }
                    }
                    other => {
                        println!("unknown command `{other}`; type {} for a list", "help".yellow());
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    if let Some(s) = session.take() {
        s.logout();
    }
    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn print_help() {
    println!("  login                      authenticate against the directory");
    println!("  logout                     close the session and discard the cart");
    println!("  board [YYYY-MM-DD]         show committed records");
    println!("  refresh                    invalidate the read cache");
    println!("  stage <text>               stage a report entry");
    println!("  attach <path> <text>       stage an entry with a file attachment");
    println!("  cart                       list staged entries");
    println!("  discard                    clear the cart");
    println!("  commit <YYYY-MM-DD>        submit the cart for a meeting date");
    println!("  quit                       exit");
}

/// Interactive login: selectors come from the cached directory.
async fn handle_login(
    rl: &mut DefaultEditor,
    cache: &ReadCache,
) -> Result<Session, MinutelogError> {
    let snapshot = cache.get().await?;
    let directory = Directory::new(snapshot.directory.clone());
    if directory.is_empty() {
        return Err(MinutelogError::Validation(
            "the directory is empty; seed the config table first".into(),
        ));
    }

    println!("departments: {}", directory.departments().join(", "));
    let department = read_line(rl, "department> ")?;

    let groups = directory.groups_for(&department);
    if groups.is_empty() {
        return Err(MinutelogError::Validation(format!(
            "no groups under department `{department}`"
        )));
    }
    println!("groups: {}", groups.join(", "));
    let group = read_line(rl, "group> ")?;

    let secret = rpassword::prompt_password("password: ")
        .map_err(|e| MinutelogError::Internal(format!("failed to read password: {e}")))?;

    Session::login(&directory, &department, &group, &secret)
}

fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<String, MinutelogError> {
    rl.readline(prompt)
        .map(|line| line.trim().to_string())
        .map_err(|e| MinutelogError::Internal(format!("input aborted: {e}")))
}

fn handle_stage(session: &mut Session, rest: &str) -> Result<(), MinutelogError> {
    session.cart_mut().stage(rest, None)?;
    println!("staged ({} in cart)", session.cart().len());
    Ok(())
}

fn handle_attach(
    session: &mut Session,
    rest: &str,
    relay_configured: bool,
) -> Result<(), MinutelogError> {
    if !relay_configured {
        return Err(MinutelogError::Config(
            "relay.endpoint is not configured; attachments cannot be uploaded".into(),
        ));
    }

    let (path, content) = rest
        .split_once(' ')
        .map(|(p, c)| (p, c.trim()))
        .ok_or_else(|| MinutelogError::Validation("usage: attach <path> <text>".into()))?;

    let path = Path::new(path);
    let bytes = std::fs::read(path)
        .map_err(|e| MinutelogError::Validation(format!("cannot read {}: {e}", path.display())))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();
    let mime_type = mime_for_extension(path).to_string();

    debug!(filename, mime_type, size = bytes.len(), "attachment read");
    session.cart_mut().stage(
        content,
        Some(Attachment {
            bytes,
            filename,
            mime_type,
        }),
    )?;
    println!("staged with attachment ({} in cart)", session.cart().len());
    Ok(())
}

fn print_cart(session: &Session) {
    if session.cart().is_empty() {
        println!("cart is empty");
        return;
    }
    for (index, item) in session.cart().items().iter().enumerate() {
        let attachment = item
            .attachment
            .as_ref()
            .map(|a| a.filename.as_str())
            .unwrap_or("-");
        println!("  {:>2}. {}  [{}]", index + 1, item.content, attachment);
    }
}

async fn handle_commit(
    session: &mut Session,
    rest: &str,
    pipeline: &CommitPipeline,
) -> Result<(), MinutelogError> {
    let meeting_date = NaiveDate::parse_from_str(rest, DATE_FORMAT)
        .map_err(|_| MinutelogError::Validation("usage: commit <YYYY-MM-DD>".into()))?;

    let total = session.cart().len();
    if total == 0 {
        println!("nothing staged");
        return Ok(());
    }

    let bar = ProgressBar::new(total as u64);
    let outcome = pipeline
        .commit(session, meeting_date, |progress| {
            bar.set_position(progress.completed as u64);
        })
        .await;
    bar.finish_and_clear();

    match outcome {
        CommitOutcome::Success(receipt) => {
            println!(
                "{}",
                format!("{} report(s) submitted", receipt.appended).green()
            );
            for failure in &receipt.attachment_failures {
                println!(
                    "{}",
                    format!(
                        "attachment `{}` failed ({}); its report was submitted without a link{}",
                        failure.filename,
                        failure.error,
                        if failure.error.is_retryable() {
                            " -- resubmitting just the attachment may work"
                        } else {
                            ""
                        }
                    )
                    .yellow()
                );
            }
        }
        CommitOutcome::FatalStop {
            failed_index,
            appended,
            reason,
            ..
        } => {
            let cause = match &reason {
                HaltReason::Store(e) if e.is_rate_limited() => {
                    format!("{e}; wait a minute before retrying")
                }
                HaltReason::Store(e) => e.to_string(),
                HaltReason::Cancelled => "commit cancelled".to_string(),
            };
            println!(
                "{}",
                format!("stopped at entry {} of {total}: {cause}", failed_index + 1).red()
            );
            println!(
                "{}",
                format!(
                    "{appended} report(s) were already submitted and remain staged; \
                     retrying the commit will submit them again"
                )
                .yellow()
            );
        }
    }
    Ok(())
}

/// MIME type from the file extension. The original form accepted
/// png/jpg/jpeg/pdf; anything else ships as an opaque byte stream.
fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
