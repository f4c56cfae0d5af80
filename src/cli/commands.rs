use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::client::HttpClient;
use crate::api::dispatcher::{Delivery, DispatchConfig, Dispatcher, Exchange, Outgoing, Reply};
use crate::cli::args::{IoArgs, RuntimeArgs};
use crate::config::settings::Settings;
use crate::session::manager::SessionManager;
use crate::utils::format;

fn build_dispatcher(settings: &Settings, runtime: &RuntimeArgs) -> Result<Dispatcher> {
    let mut config = DispatchConfig::from_settings(settings)?;
    if let Some(endpoint) = &runtime.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(method) = &runtime.method {
        config.method = reqwest::Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| anyhow!("Invalid HTTP method: {}", method))?;
    }
    if let Some(field) = &runtime.field {
        config.field_name = field.clone();
    }
    Ok(HttpClient::new()?.into_dispatcher(config))
}

fn export_dir(settings: &Settings, io: &IoArgs) -> PathBuf {
    io.export_dir
        .as_deref()
        .or(settings.export_dir.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn round_trip(dispatcher: &Dispatcher, session: &mut SessionManager, outgoing: &Outgoing) -> Reply {
    let pb = ProgressBar::new_spinner().with_message("typing...");
    if let Ok(s) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(s);
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    let reply = dispatcher.dispatch(session, outgoing).await;
    pb.finish_and_clear();
    reply
}

fn print_reply(reply: &Reply, html: bool) {
    if html {
        println!("{}", reply.html);
    } else if reply.delivery == Delivery::Failed {
        println!("{} {}", format::bot_tag(), format::failure(&reply.text));
    } else if reply.text.is_empty() {
        println!("{} {}", format::bot_tag(), style("(no content)").italic());
    } else {
        println!("{} {}", format::bot_tag(), reply.text);
    }
}

fn write_output(io: &IoArgs, exchange: &Exchange) -> Result<()> {
    if let Some(out) = &io.output_file {
        let content = if io.html { &exchange.reply.html } else { &exchange.reply.text };
        crate::utils::io::write_string(out, content)?;
    }
    Ok(())
}

pub async fn handle_chat(settings: &Settings, prompt: Option<String>, runtime: &RuntimeArgs, io: &IoArgs) -> Result<()> {
    // Prefer file input if provided
    let prompt = match (&io.input_file, &prompt) {
        (Some(path), _) => crate::utils::io::read_to_string(path)?,
        (None, Some(p)) => p.to_string(),
        _ => String::new(),
    };

    let dispatcher = build_dispatcher(settings, runtime)?;
    let mut session = SessionManager::new();
    let outgoing = dispatcher
        .accept(&mut session, &prompt)
        .ok_or_else(|| anyhow!("Prompt is empty. Provide text or use interactive mode."))?;
    if io.html {
        println!("{}", outgoing.user_html);
    }
    let reply = round_trip(&dispatcher, &mut session, &outgoing).await;
    print_reply(&reply, io.html);
    write_output(io, &Exchange { outgoing, reply })
}

pub async fn handle_interactive(settings: &Settings, runtime: &RuntimeArgs, io: &IoArgs) -> Result<()> {
    use dialoguer::Input;

    let dispatcher = build_dispatcher(settings, runtime)?;
    let export_to = export_dir(settings, io);
    let mut session = SessionManager::new();
    println!(
        "{}",
        style(format!("Chatting with {}. /clear, /export, /quit.", dispatcher.config().endpoint)).cyan()
    );
    loop {
        let line: String = Input::new().with_prompt("You").allow_empty(true).interact_text()?;
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => return Ok(()),
            "/clear" => {
                session.clear();
                println!("{}", format::notice("Conversation cleared."));
                continue;
            }
            "/export" => {
                report_export(&session, &export_to);
                continue;
            }
            _ => {}
        }
        let Some(outgoing) = dispatcher.accept(&mut session, &line) else { continue };
        if io.html {
            println!("{}", outgoing.user_html);
        }
        let reply = round_trip(&dispatcher, &mut session, &outgoing).await;
        print_reply(&reply, io.html);
    }
}

fn report_export(session: &SessionManager, dir: &Path) {
    match session.export(dir) {
        Ok(path) => println!("{}", format::success(&format!("Saved {}", path.display()))),
        Err(e) => println!("{}", format::failure(&e.to_string())),
    }
}

pub async fn handle_config_init(force: bool, scope: Option<&str>) -> Result<()> {
    let root = match scope {
        Some("project") => Some(std::env::current_dir()?),
        _ => None,
    };
    let path = Settings::init_scoped(force, root.as_deref())?;
    println!("{}", format::success(&format!("Wrote {}", path.display())));
    Ok(())
}

pub async fn handle_config_list(settings: &Settings) -> Result<()> {
    println!("Endpoint: {}", settings.endpoint());
    println!("Method: {}", settings.method);
    println!("Field: {}", settings.field_name);
    println!("Reply fields: {}", settings.reply_fields.join(", "));
    println!("Export dir: {}", settings.export_dir.as_deref().unwrap_or("."));
    Ok(())
}

pub async fn handle_config_set(settings: &mut Settings, config_path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    settings.set(key, value)?;
    settings.save_with(None, config_path)?;
    println!("{}", format::success(&format!("Set {} = {}", key, value)));
    Ok(())
}
