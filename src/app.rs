//! Composition root: wires config, catalog, gateway, audio, and the form
//! into the interactive drafting commands.

use crate::audio::capture::{list_devices, suppress_audio_warnings, CpalAudioSource};
use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::error::{Result, VdraftError};
use crate::form::{DraftForm, ViewMode};
use crate::gateway::HttpTranscriptionGateway;
use crate::prompts::{collect_prompts, PromptSyncClient};
use crate::richtext::{MarkdownEngine, RichTextBuffer};
use owo_colors::OwoColorize;
use std::io::{BufRead, Write};
use std::time::Duration;

/// Run the topics command: list draftable document topics.
pub async fn run_topics_command(config: &Config) -> Result<()> {
    let catalog = CatalogClient::new(&config.server.base_url, server_timeout(config))?;
    let documents = catalog.list_documents().await?;

    if documents.is_empty() {
        println!("No document topics available.");
        return Ok(());
    }

    for (index, doc) in documents.iter().enumerate() {
        println!("{}", doc.label(index));
    }

    Ok(())
}

/// Run the devices command: list usable audio input devices.
pub fn run_devices_command() -> Result<()> {
    suppress_audio_warnings();

    let devices = list_devices()?;
    if devices.is_empty() {
        println!("No audio input devices found.");
        return Ok(());
    }

    for device in devices {
        println!("{}", device);
    }

    Ok(())
}

/// Run the draft command: fetch the topic's schema, sync prompts, and drive
/// the interactive drafting form until the user quits.
///
/// # Arguments
/// * `config` - Base configuration (CLI overrides already applied)
/// * `topic` - Topic name as listed by the catalog
/// * `device` - Optional audio device override
/// * `quiet` - Suppress status messages
pub async fn run_draft_command(
    config: &Config,
    topic: &str,
    device: Option<&str>,
    quiet: bool,
) -> Result<()> {
    suppress_audio_warnings();

    let timeout = server_timeout(config);
    let catalog = CatalogClient::new(&config.server.base_url, timeout)?;

    if !quiet {
        eprintln!("Fetching document schema for '{}'...", topic);
    }
    let schema = catalog.fetch_document(topic).await?;

    // Prompts must reach the backend before drafting starts; transcribing
    // against stale prompts silently produces wrong content.
    if let Some(seeds) = schema.fields.as_deref() {
        let prompts = collect_prompts(seeds);
        if !prompts.is_empty() {
            let sync = PromptSyncClient::new(&config.server.base_url, timeout)?;
            sync.push(&prompts).await.map_err(|e| VdraftError::Service {
                message: format!("Failed to update prompts, not opening the form: {}", e),
            })?;
            if !quiet {
                eprintln!("Synced {} field prompts.", prompts.len());
            }
        }
    }

    let device_name = device.or(config.audio.device.as_deref());
    let source = CpalAudioSource::new(device_name)?.with_sample_rate(config.audio.sample_rate);
    let gateway = HttpTranscriptionGateway::new(&config.server.base_url, timeout)?;

    let mut form = DraftForm::new(
        &schema,
        Box::new(source),
        Box::new(MarkdownEngine::new()),
        config.audio.sample_rate,
    )?;

    if !quiet {
        eprintln!("Drafting '{}'. Type 'help' for commands.", form.title());
    }

    let stdin = std::io::stdin();
    render(&form);

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if form.editing_index().is_some() {
            if handle_editor_line(&mut form, input) {
                render(&form);
            }
            continue;
        }

        match parse_command(input) {
            Command::Show => render(&form),
            Command::Set(index, text) => {
                if !form.set_field_content(index, text) {
                    eprintln!("No field at index {}.", index);
                }
                render(&form);
            }
            Command::Record(index) => {
                if form.start_recording(index) && !quiet {
                    eprintln!("Recording into field {}. Type 'stop' to finish.", index);
                }
                render(&form);
            }
            Command::Stop => {
                form.poll_audio();
                if !quiet && form.recorder_state().is_recording() {
                    eprintln!("Transcribing...");
                }
                form.stop_recording(&gateway).await;
                render(&form);
            }
            Command::Add(index) => {
                match form.insert_field_after(index) {
                    Some(new_index) => {
                        if !quiet {
                            eprintln!("Added field at index {}.", new_index);
                        }
                    }
                    None => eprintln!("No field at index {}.", index),
                }
                render(&form);
            }
            Command::Edit(index) => {
                match form.open_editor(index) {
                    Ok(()) => {
                        eprintln!(
                            "Editing field {}. Lines append blocks; ':save' commits, ':cancel' discards.",
                            index
                        );
                        print_draft(&form);
                    }
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
            Command::Preview => {
                form.toggle_preview();
                render(&form);
            }
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Unknown => {
                eprintln!("Unknown command. Type 'help' for commands.");
            }
        }
    }

    // The draft is deliberately not persisted; the collection dies with
    // the form.
    Ok(())
}

fn server_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.server.timeout_secs)
}

enum Command {
    Show,
    Set(usize, String),
    Record(usize),
    Stop,
    Add(usize),
    Edit(usize),
    Preview,
    Help,
    Quit,
    Unknown,
}

fn parse_command(input: &str) -> Command {
    let mut tokens = input.split_whitespace();
    let verb = tokens.next().unwrap_or_default();
    let index = tokens.next().and_then(|s| s.parse::<usize>().ok());

    match (verb, index) {
        ("show", _) => Command::Show,
        ("set", Some(i)) => Command::Set(i, tokens.collect::<Vec<_>>().join(" ")),
        ("record", Some(i)) => Command::Record(i),
        ("stop", _) => Command::Stop,
        ("add", Some(i)) => Command::Add(i),
        ("edit", Some(i)) => Command::Edit(i),
        ("preview", _) => Command::Preview,
        ("help", _) => Command::Help,
        ("quit", _) | ("exit", _) => Command::Quit,
        _ => Command::Unknown,
    }
}

/// Apply one input line to the open editor. Returns true when the session
/// closed (saved or cancelled).
fn handle_editor_line(form: &mut DraftForm, input: &str) -> bool {
    match input {
        ":save" => {
            form.save_editor();
            true
        }
        ":cancel" => {
            form.cancel_editor();
            true
        }
        ":show" => {
            print_draft(form);
            false
        }
        ":clear" => {
            if let Some(buffer) = form.editor_buffer_mut() {
                buffer.replace_text("");
            }
            print_draft(form);
            false
        }
        line => {
            if let Some(buffer) = form.editor_buffer_mut() {
                buffer.append_line(line);
            }
            false
        }
    }
}

fn print_draft(form: &DraftForm) {
    if let Some(draft) = form.editor_draft() {
        println!("--- draft ---");
        println!("{}", draft);
        println!("-------------");
    }
}

/// Redraw the form: error banner, then either the field list or the
/// preview, then the recorder status line.
fn render(form: &DraftForm) {
    let mut out = std::io::stdout().lock();

    if let Some(error) = form.error() {
        let _ = writeln!(out, "{}", error.red());
    }

    match form.view_mode() {
        ViewMode::Preview => {
            if let Some(preview) = form.preview() {
                let _ = writeln!(out, "{}", preview.to_html());
                let _ = writeln!(out, "(type 'preview' to go back to editing)");
            }
        }
        ViewMode::Edit => {
            let _ = writeln!(out, "{}", form.title().bold());
            for (index, field) in form.fields().iter().enumerate() {
                let _ = writeln!(out, "[{}] {}", index, field.name.bold());
                if field.content.is_empty() {
                    let _ = writeln!(out, "    (empty)");
                } else {
                    for line in field.content.lines() {
                        let _ = writeln!(out, "    {}", line);
                    }
                }
            }
            let state = form.recorder_state();
            if state.is_recording() {
                let _ = writeln!(out, "{}", "● recording".red());
            } else if state.is_processing() {
                let _ = writeln!(out, "processing audio...");
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  show            redraw the form");
    println!("  set <i> <text>  replace field i's content");
    println!("  record <i>      dictate into field i");
    println!("  stop            stop dictating and transcribe");
    println!("  add <i>         insert a new field after i");
    println!("  edit <i>        open the rich-text editor on field i");
    println!("  preview         toggle document preview");
    println!("  quit            leave (drafts are not saved)");
}
