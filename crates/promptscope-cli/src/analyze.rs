use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use promptscope_core::{
    AnalysisError, AnalysisRequest, AnalysisResult, Credentials, InfluenceReport,
    PromptscopeConfig, ProviderCatalog, ProviderKind,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// anthropic | openai (defaults to the configured provider, then anthropic)
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,

    /// Model id; see `promptscope models`
    #[arg(short, long)]
    pub model: Option<String>,

    #[arg(long, value_name = "PATH", conflicts_with = "system_prompt")]
    pub system_prompt_file: Option<PathBuf>,

    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    #[arg(long, value_name = "PATH", conflicts_with = "conversation")]
    pub conversation_file: Option<PathBuf>,

    #[arg(long, value_name = "TEXT")]
    pub conversation: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    if let Some(text) = text {
        return Ok(Some(text));
    }
    match file {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Error reading files: {}", path.display()))?;
            Ok(Some(data))
        }
        None => Ok(None),
    }
}

pub async fn run(args: AnalyzeArgs) -> Result<ExitCode> {
    let system_prompt = read_input(args.system_prompt, args.system_prompt_file.as_deref())?;
    let conversation = read_input(args.conversation, args.conversation_file.as_deref())?;
    let (Some(system_prompt), Some(conversation)) = (system_prompt, conversation) else {
        eprintln!("Please provide both a system prompt and a conversation log.");
        return Ok(ExitCode::from(2));
    };

    let config = PromptscopeConfig::load()?;
    let (provider, model) = config.select(args.provider, args.model.as_deref());

    let request = match AnalysisRequest::new(system_prompt, conversation, provider, model) {
        Ok(r) => r,
        Err(e) => return Ok(report_failure(&e)),
    };

    debug!(provider = %provider, model = %request.model(), "analysis selected");
    let analyzer = Credentials::load()?.build_analyzer();
    let display = ProviderCatalog::display_name(provider, request.model()).unwrap_or(request.model());
    eprintln!("Analyzing using {display}...");

    let result = match analyzer.analyze_influence(&request).await {
        Ok(result) => result,
        Err(e) => return Ok(report_failure(&e)),
    };

    let rendered = match args.format {
        OutputFormat::Text => render_text(provider, &result),
        OutputFormat::Json => render_json(provider, &result)?,
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote analysis to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(ExitCode::SUCCESS)
}

/// Exit status and stderr message for an analysis that produced no result.
/// Input problems exit with 2, provider failures with 1.
fn failure_outcome(err: &AnalysisError) -> (u8, String) {
    match err {
        AnalysisError::EmptyInput { .. } => (2, err.to_string()),
        AnalysisError::UnsupportedModel { .. } => (
            2,
            format!("{err}; run `promptscope models` to list valid choices"),
        ),
        AnalysisError::ProviderNotConfigured { .. } => (
            1,
            format!(
                "{err}\nRun `promptscope setup` or set the provider's API key environment variable."
            ),
        ),
        AnalysisError::Remote { .. } => (1, err.to_string()),
    }
}

fn report_failure(err: &AnalysisError) -> ExitCode {
    let (code, message) = failure_outcome(err);
    eprintln!("{message}");
    ExitCode::from(code)
}

fn model_label(provider: ProviderKind, model: &str) -> &str {
    ProviderCatalog::display_name(provider, model).unwrap_or(model)
}

fn render_text(provider: ProviderKind, result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str("Analysis Results\n\n");
    out.push_str("Model Information\n");
    out.push_str(&format!("Provider: {provider}\n"));
    out.push_str(&format!(
        "Model: {}\n\n",
        model_label(provider, &result.model_used)
    ));
    out.push_str("Analysis with Detailed Breakdown\n");
    out.push_str(&result.raw_analysis);
    if !result.raw_analysis.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn render_json(provider: ProviderKind, result: &AnalysisResult) -> Result<String> {
    let report = InfluenceReport::parse(&result.raw_analysis);
    let value = json!({
        "provider": provider,
        "model": result.model_used,
        "model_display": model_label(provider, &result.model_used),
        "raw_analysis": result.raw_analysis,
        "report": report,
        "mean_influence_score": report.mean_score(),
    });
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}
