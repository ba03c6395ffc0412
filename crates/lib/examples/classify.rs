use anyprompt::{providers::factory::create_provider, PromptClientBuilder, ProviderConfig};
use dotenvy::dotenv;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging and load .env file
    tracing_subscriber::fmt::init();
    dotenv().ok();

    // --- Command-line argument parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} '<support ticket text>'", args[0]);
        eprintln!();
        eprintln!(
            "Example: {} 'I was charged twice for my subscription and nobody answers my emails.'",
            args[0]
        );
        return Ok(());
    }
    let ticket = &args[1];

    // --- Configuration from environment variables ---
    let config = ProviderConfig {
        provider: env::var("AI_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
        api_url: env::var("AI_API_URL").ok(),
        api_key: env::var("AI_API_KEY").ok(),
        model_name: env::var("AI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
    };

    // --- Build Prompt Client ---
    let client = PromptClientBuilder::new()
        .ai_provider(create_provider(&config)?)
        .model(config.model_name.clone())
        .temperature(0.0)
        .build()?;

    // --- Classify ---
    match client.classify(ticket).await {
        Ok(prediction) => {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Err(e) => {
            eprintln!("Error classifying ticket: {e}");
        }
    }

    Ok(())
}
