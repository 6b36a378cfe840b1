//! The `answer` command — one question through the full pipeline.

use std::sync::Arc;

use adjutant_config::AppConfig;
use adjutant_core::answer::ServedBy;
use adjutant_core::error::{Error, ProviderError};
use adjutant_core::tier::ModelTier;
use adjutant_pipeline::AnswerPipeline;
use adjutant_providers::OpenAiCompatProvider;

use crate::context_source::FileContextSource;

pub async fn run(
    question: &str,
    page: &str,
    tier: Option<ModelTier>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let store = super::open_store(&config).await?;
    let provider = Arc::new(OpenAiCompatProvider::from_config(&config)?);

    let pipeline = AnswerPipeline::new(
        Arc::new(FileContextSource::from_env()),
        store.clone(),
        store.clone(),
        store,
        provider,
        config.budget.daily_token_limit,
    );

    let answer = match pipeline.answer(question, page, tier).await {
        Ok(answer) => answer,
        Err(Error::Provider(err)) => {
            eprintln!("{}", provider_failure_message(&err));
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", answer.text);

    if !answer.suggestions.is_empty() {
        println!();
        println!("You could also ask:");
        for suggestion in &answer.suggestions {
            println!("  · {suggestion}");
        }
    }

    println!();
    match answer.served_by {
        ServedBy::Local => println!("  (answered locally from today's snapshot)"),
        ServedBy::Cache => println!("  (served from cache)"),
        ServedBy::Model(tier) => println!("  (answered by the {tier} tier)"),
    }

    Ok(())
}

/// Short, honest message for a failed model call. Retryable failures are
/// described as temporary degradation; everything else as unavailable.
fn provider_failure_message(err: &ProviderError) -> String {
    if err.is_retryable() {
        format!("The answering service is temporarily degraded ({err}). Please try again shortly.")
    } else {
        format!("The answering service is unavailable ({err}).")
    }
}
