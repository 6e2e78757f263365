use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::Context;
use serde::Deserialize;

use tgb_core::{formatting::render_html, MessageEntity, TelegramObject};

mod config;

use config::{Config, OutputFormat};

/// The part of a Bot API `Message` this tool looks at. Captions work too.
#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(alias = "caption")]
    text: String,
    #[serde(default, alias = "caption_entities")]
    entities: Vec<serde_json::Value>,
}

fn main() -> anyhow::Result<()> {
    tgb_core::logging::init("tgb")?;

    let cfg = Config::load();
    let raw = read_input(cfg.input_path())?;
    let out = render(&cfg, &raw)?;
    println!("{out}");

    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn render(cfg: &Config, raw: &str) -> anyhow::Result<String> {
    let payload: MessagePayload =
        serde_json::from_str(raw).context("input is not a message payload")?;
    let entities =
        MessageEntity::de_list(payload.entities, None).context("malformed message entity")?;

    let out = match cfg.format {
        OutputFormat::Entities => entities
            .iter()
            .map(|e| {
                let covered = e
                    .extract(&payload.text)
                    .unwrap_or_else(|| "<out of range>".to_string());
                format!("{}\t{}\t{}\t{covered}", e.kind(), e.offset(), e.length())
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Html => render_html(&payload.text, &entities, cfg.urled),
        OutputFormat::Json => serde_json::to_string_pretty(&entities)?,
    };

    Ok(out)
}
