//! doc-chat: a terminal chat over loaded documents and web pages.
//!
//! Commands:
//! - `:pdf <path>`   load a (pre-extracted) PDF text file
//! - `:word <path>`  load a (pre-extracted) Word text file
//! - `:web <url>`    load a website
//! - `:new`          start a new chat (loaded content survives)
//! - `:quit`         exit
//!
//! Anything else is sent to the session as a question.

use std::io::{BufRead, Write};
use std::sync::Arc;

use chat_session::{ChatSession, SessionCapabilities, SourceKind};
use colored::Colorize;
use doc_sources::{PlainTextReader, SourceReader, WebPageReader};
use llm_service::config::default_config::{config_chat_from_env, config_embedding_from_env};
use llm_service::services::ollama_service::OllamaService;
use llm_service::services::open_ai_service::OpenAiService;
use llm_service::{CompletionCapability, EmbeddingCapability, LlmProvider};
use query_enrich::{DatamuseClient, LanguageToolClient, SpellCheckCapability, SynonymCapability};
use tracing::{Level, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; explicit env vars still apply.
    let _ = dotenvy::dotenv();

    // Default everything to INFO, with llm-service raised per its own directive.
    let filter = llm_service::telemetry::env_filter_with_level("info", Level::INFO);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let session = ChatSession::new(build_capabilities());
    let web_reader = WebPageReader::new(30)?;
    let text_reader = PlainTextReader::new();

    for message in session.transcript().await {
        println!("{} {}", "bot>".green().bold(), message.text);
    }

    let stdin = std::io::stdin();
    loop {
        print!("{} ", "you>".cyan().bold());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match line.split_once(' ') {
            _ if line == ":quit" => break,
            _ if line == ":new" => Some(session.new_chat().await),
            Some((":pdf", path)) => {
                Some(load(&session, SourceKind::Pdf, path, &text_reader).await)
            }
            Some((":word", path)) => {
                Some(load(&session, SourceKind::Word, path, &text_reader).await)
            }
            Some((":web", url)) => Some(load(&session, SourceKind::Web, url, &web_reader).await),
            _ => session.send(line).await,
        };

        if let Some(reply) = reply {
            println!("{} {}", "bot>".green().bold(), reply);
        }
    }

    Ok(())
}

async fn load(
    session: &ChatSession,
    kind: SourceKind,
    target: &str,
    reader: &dyn SourceReader,
) -> String {
    session.load_source(kind, target.trim(), reader).await
}

/// Wires capabilities from the environment. Every capability is optional:
/// whatever is missing degrades to keyword-only retrieval or identity
/// enrichment.
fn build_capabilities() -> SessionCapabilities {
    let mut caps = SessionCapabilities::default();

    match (config_embedding_from_env(), config_chat_from_env()) {
        (Ok(embedding_cfg), Ok(chat_cfg)) => {
            let embedding: Option<Arc<dyn EmbeddingCapability>> = match embedding_cfg.provider {
                LlmProvider::OpenAi => OpenAiService::new(embedding_cfg)
                    .map(|s| Arc::new(s) as Arc<dyn EmbeddingCapability>)
                    .ok(),
                LlmProvider::Ollama => OllamaService::new(embedding_cfg)
                    .map(|s| Arc::new(s) as Arc<dyn EmbeddingCapability>)
                    .ok(),
            };
            let completion: Option<Arc<dyn CompletionCapability>> = match chat_cfg.provider {
                LlmProvider::OpenAi => OpenAiService::new(chat_cfg)
                    .map(|s| Arc::new(s) as Arc<dyn CompletionCapability>)
                    .ok(),
                LlmProvider::Ollama => OllamaService::new(chat_cfg)
                    .map(|s| Arc::new(s) as Arc<dyn CompletionCapability>)
                    .ok(),
            };
            if embedding.is_some() && completion.is_some() {
                info!("semantic retrieval enabled");
            }
            caps.embedding = embedding;
            caps.completion = completion;
        }
        (embedding, chat) => {
            for err in [embedding.err(), chat.err()].into_iter().flatten() {
                warn!(error = %err, "LLM capability unavailable; keyword retrieval only");
            }
        }
    }

    let synonyms_url = std::env::var("SYNONYM_API_URL")
        .unwrap_or_else(|_| "https://api.datamuse.com".to_string());
    caps.synonyms = DatamuseClient::new(&synonyms_url, 10)
        .map(|c| Arc::new(c) as Arc<dyn SynonymCapability>)
        .inspect_err(|err| warn!(error = %err, "synonym capability unavailable"))
        .ok();

    // Spell checking is opt-in: only wired when an endpoint is configured.
    if let Ok(spell_url) = std::env::var("SPELL_API_URL") {
        caps.spell = LanguageToolClient::new(&spell_url, "en-US", 10)
            .map(|c| Arc::new(c) as Arc<dyn SpellCheckCapability>)
            .inspect_err(|err| warn!(error = %err, "spell capability unavailable"))
            .ok();
    }

    caps
}
