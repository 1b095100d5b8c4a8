use anyhow::Result;
use promptscope_core::{Credentials, ProviderCredentials, ProviderKind};
use std::io::{self, BufRead, Write};

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn run_setup() -> Result<Credentials> {
    let mut creds = Credentials::load_from(&Credentials::path())?;

    println!("\npromptscope setup");
    println!("Choose a provider to configure:");
    println!("  [1] Anthropic       (api.anthropic.com)");
    println!("  [2] OpenAI          (api.openai.com)");

    let choice = read_line("\n> ")?;
    let provider = match choice.as_str() {
        "1" => ProviderKind::Anthropic,
        "2" => ProviderKind::OpenAi,
        other => match other.parse::<ProviderKind>() {
            Ok(p) => p,
            Err(_) => {
                println!("Invalid choice, defaulting to Anthropic.");
                ProviderKind::Anthropic
            }
        },
    };

    print!("Enter {provider} API key: ");
    io::stdout().flush()?;
    let api_key = rpassword::read_password()?.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("no API key entered; nothing saved");
    }

    let base_url = read_line("Base URL [provider default]: ")?;
    let base_url = (!base_url.is_empty()).then_some(base_url);

    creds.set(provider, ProviderCredentials { api_key, base_url });
    creds.save()?;
    println!("Saved to {}\n", Credentials::path().display());

    Ok(creds)
}
