use clap::{Arg, Command};
use novel_reader::{DEFAULT_LANGUAGE, languages};
use novel_reader_mt::{
    BackendError, MockBackend, MockMode, ModelFallbackClient, TranslatorConfig, build_prompt,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let matches = Command::new("novel-mt")
        .version("0.1.0")
        .about("Translate a passage with the primary/fallback model policy")
        .arg(
            Arg::new("text")
                .help("Passage to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .short('l')
                .help("Target language name (e.g. French, Japanese)")
                .default_value(DEFAULT_LANGUAGE),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock backends instead of the Gemini API")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show models, prompt and log output")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let text = matches
        .get_one::<String>("text")
        .ok_or("missing text argument")?;
    let language = matches
        .get_one::<String>("language")
        .ok_or("missing language argument")?;
    let use_mock = matches.get_flag("mock");
    let verbose = matches.get_flag("verbose");

    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if text.trim().is_empty() {
        return Err("Nothing to translate: the passage is blank".into());
    }

    let config = TranslatorConfig::from_env()?;
    if verbose {
        println!("📝 Source: \"{}\"", text);
        println!("🌍 Target: {}", languages::display_name(language));
        println!(
            "🤖 Models: {} → {}",
            config.primary_model, config.fallback_model
        );
        println!();
        println!("{}", build_prompt(text, language));
        println!();
    }

    let client = if use_mock {
        // Primary always hits its quota so the fallback hop is exercised.
        let primary = MockBackend::failing(BackendError::Quota("mock quota exceeded".to_string()))
            .named("mock-primary");
        let secondary = MockBackend::new(MockMode::Echo).named("mock-fallback");
        ModelFallbackClient::with_backends(
            &TranslatorConfig::new("mock"),
            Arc::new(primary),
            Arc::new(secondary),
        )
    } else {
        if !config.has_credentials() {
            eprintln!("❌ GEMINI_API_KEY environment variable not set");
            eprintln!("   Set it with: export GEMINI_API_KEY=your_api_key");
            eprintln!("   Or use --mock to use mock backends");
            return Err("missing credentials".into());
        }
        ModelFallbackClient::from_config(&config)?
    };

    match client.translate(text, language).await {
        Ok(translation) => {
            println!("{}", translation);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            Err(e.into())
        }
    }
}
