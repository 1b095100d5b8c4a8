use promptscope_core::{Credentials, ProviderCatalog};

pub fn run() {
    let creds = Credentials::load().unwrap_or_default();
    for provider in ProviderCatalog::providers() {
        let status = if creds.is_configured(*provider) {
            "configured"
        } else {
            "no API key"
        };
        println!("{provider} ({}, {status})", provider.slug());
        for (i, model) in ProviderCatalog::models(*provider).iter().enumerate() {
            let marker = if i == 0 { " (default)" } else { "" };
            println!("  {:<28} {}{marker}", model.id, model.display_name);
        }
        println!();
    }
}
