//! Server binary for vision-relay.
//!
//! A thin shim over the library crate that maps CLI flags / environment
//! variables to `RelayConfig`, installs logging, and serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vision_relay::{server, Dispatcher, PdfiumRasterizer, PromptStyle, RelayConfig};

const AFTER_HELP: &str = r#"ENVIRONMENT VARIABLES:
  TELEGRAM_BOT_TOKEN   Bot token from @BotFather (required)
  OPENAI_API_KEY       Completion API key (required)
  TELEGRAM_CHAT_ID     Chat that /upload results are mirrored to
  PORT                 Listening port (default 8080)
  PDFIUM_LIB_PATH      Path to libpdfium; system library otherwise

SETUP:
  1. export TELEGRAM_BOT_TOKEN=123456:ABC... OPENAI_API_KEY=sk-...
  2. vision-relay
  3. curl "https://api.telegram.org/bot$TELEGRAM_BOT_TOKEN/setWebhook?url=https://<host>/webhook"
"#;

/// Relay Telegram photos and PDFs through a vision model.
#[derive(Parser, Debug)]
#[command(
    name = "vision-relay",
    version,
    about = "Telegram webhook that reads photos and PDFs with a vision model",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Completion API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Chat that /upload results are mirrored to.
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    chat_id: Option<i64>,

    /// Listening port.
    #[arg(long, env = "PORT", default_value_t = vision_relay::config::DEFAULT_PORT)]
    port: u16,

    /// Multimodal model ID.
    #[arg(long, env = "OPENAI_MODEL", default_value = vision_relay::config::DEFAULT_MODEL)]
    model: String,

    /// Telegram Bot API origin.
    #[arg(long, env = "TELEGRAM_API_BASE", default_value = vision_relay::config::DEFAULT_TELEGRAM_API_BASE)]
    telegram_api_base: String,

    /// Completion API origin.
    #[arg(long, env = "OPENAI_API_BASE", default_value = vision_relay::config::DEFAULT_OPENAI_API_BASE)]
    openai_api_base: String,

    /// Instruction for photos sent to the bot.
    #[arg(long, env = "PHOTO_PROMPT", value_enum, default_value = "free-text")]
    photo_prompt: PromptArg,

    /// Instruction for /upload.
    #[arg(long, env = "UPLOAD_PROMPT", value_enum, default_value = "structured")]
    upload_prompt: PromptArg,

    /// Send the rendered PDF page back before the text reply.
    #[arg(long, env = "SEND_RENDERED_PAGE", default_value_t = true, action = clap::ArgAction::Set)]
    send_rendered_page: bool,

    /// Longest edge of the rendered PDF page, in pixels.
    #[arg(long, env = "MAX_RENDERED_PIXELS", default_value_t = 2000)]
    max_rendered_pixels: u32,

    /// Path to libpdfium.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RELAY_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PromptArg {
    FreeText,
    Document,
    Structured,
}

impl From<PromptArg> for PromptStyle {
    fn from(v: PromptArg) -> Self {
        match v {
            PromptArg::FreeText => PromptStyle::FreeText,
            PromptArg::Document => PromptStyle::DocumentSummary,
            PromptArg::Structured => PromptStyle::Structured,
        }
    }
}

fn build_config(cli: Cli) -> Result<RelayConfig> {
    RelayConfig::builder()
        .bot_token(cli.bot_token)
        .openai_api_key(cli.openai_api_key)
        .chat_id(cli.chat_id)
        .port(cli.port)
        .model(cli.model)
        .telegram_api_base(cli.telegram_api_base)
        .openai_api_base(cli.openai_api_base)
        .photo_prompt(cli.photo_prompt.into())
        .upload_prompt(cli.upload_prompt.into())
        .send_rendered_page(cli.send_rendered_page)
        .max_rendered_pixels(cli.max_rendered_pixels)
        .pdfium_lib_path(cli.pdfium_lib_path)
        .build()
        .context("Missing required environment variables: TELEGRAM_BOT_TOKEN and OPENAI_API_KEY")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = Arc::new(build_config(cli)?);
    tracing::debug!(?config, "Configuration loaded");

    let rasterizer = PdfiumRasterizer::from_config(&config);
    if let Err(e) = rasterizer.check_available() {
        tracing::warn!(error = %e, "PDF documents will fail until pdfium is available");
    }
    let rasterizer = Arc::new(rasterizer);
    let dispatcher = Dispatcher::new(config, rasterizer);

    // ── Serve ────────────────────────────────────────────────────────────
    server::serve(dispatcher)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec!["vision-relay", "--bot-token", "123:abc", "--openai-api-key", "sk-test"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).expect("valid args")
    }

    #[test]
    fn prompt_names_map_to_styles() {
        let config = build_config(parse(&[
            "--photo-prompt",
            "document",
            "--upload-prompt",
            "free-text",
        ]))
        .unwrap();
        assert_eq!(config.photo_prompt, PromptStyle::DocumentSummary);
        assert_eq!(config.upload_prompt, PromptStyle::FreeText);
    }

    #[test]
    fn unknown_prompt_name_is_rejected() {
        let result = Cli::try_parse_from([
            "vision-relay",
            "--bot-token",
            "123:abc",
            "--openai-api-key",
            "sk-test",
            "--photo-prompt",
            "document-summary",
        ]);
        assert!(result.is_err());
    }
}
