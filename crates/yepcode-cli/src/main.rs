use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::io::Read;
use std::path::PathBuf;
use yepcode_core::{
    CodeBlock, CodeExecutor, ConfigLoader, ExecutorConfig, RemoteCodeExecutor,
};

mod input;

#[derive(Parser, Debug)]
#[clap(
    name = "yepcode-exec",
    author,
    version,
    about = "Run code blocks on YepCode Run sandboxes"
)]
struct Cli {
    #[clap(help = "Markdown or source file to run; reads stdin when omitted or '-'")]
    input: Option<PathBuf>,

    #[clap(long, short, default_value = "yepcode.yaml", help = "YAML configuration file (optional)")]
    config: PathBuf,

    #[clap(long, default_value = ".env", help = "Environment file to load before resolving the token")]
    env_file: PathBuf,

    #[clap(long, help = "YepCode API token (defaults to YEPCODE_API_TOKEN)")]
    api_token: Option<String>,

    #[clap(long, help = "Base URL of the execution API (defaults to YEPCODE_API_HOST)")]
    api_host: Option<String>,

    #[clap(long, help = "Timeout in seconds for each execution")]
    timeout: Option<u64>,

    #[clap(long, help = "Remove executions on YepCode once they are done")]
    remove_on_done: bool,

    #[clap(long, help = "Submit executions without waiting for them to finish")]
    no_wait: bool,

    #[clap(
        long,
        short,
        help = "Language for untagged code blocks, or for the whole input when it has no code fences"
    )]
    language: Option<String>,

    #[clap(long, help = "Print the outcome as JSON")]
    json: bool,

    #[clap(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn apply_overrides(&self, mut config: ExecutorConfig) -> ExecutorConfig {
        if let Some(token) = &self.api_token {
            config = config.api_token(token.clone());
        }
        if let Some(host) = &self.api_host {
            config = config.api_host(host.clone());
        }
        if let Some(timeout) = self.timeout {
            config = config.timeout(timeout);
        }
        if self.remove_on_done {
            config = config.remove_on_done(true);
        }
        if self.no_wait {
            config = config.sync_execution(false);
        }
        config
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read code from stdin")?;
            Ok(buffer)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    ConfigLoader::load_env_file(&cli.env_file)?;
    let config = cli.apply_overrides(ConfigLoader::from_optional_file(&cli.config)?);
    let executor = RemoteCodeExecutor::new(config)?;

    let source = read_input(cli.input.as_ref())?;
    let extracted = executor.code_extractor().extract_code_blocks(&source);
    let code_blocks: Vec<CodeBlock> =
        input::prepare_blocks(extracted, &source, cli.language.as_deref());
    if input::needs_language_hint(&code_blocks, &source) {
        log::warn!("No code blocks found in the input");
        eprintln!(
            "hint: the input has no fenced code blocks; pass --language <LANG> to run it as a single block"
        );
    }
    log::info!("Running {} code block(s)", code_blocks.len());

    let outcome = executor.execute(&code_blocks).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }
    if let Some(id) = &outcome.execution_id {
        log::info!("Last execution id: {}", id);
    }

    std::process::exit(outcome.exit_code);
}
