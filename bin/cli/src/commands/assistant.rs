//! `spendwise assistant ...`

use super::Context;
use crate::error::{CliError, request_failed};
use crate::output::{self, OutputFormat, print_heading};
use spendwise_api::ChatMessage;
use spendwise_core::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

pub async fn analyze(ctx: &Context) -> Result<(), CliError> {
    let analysis = ctx
        .protected(async { ctx.api().assistant().analyze().await.map_err(request_failed) })
        .await?;

    output::print(&analysis, ctx.format(), |analysis| {
        println!("{}", analysis.summary);
        if !analysis.overspending_categories.is_empty() {
            print_heading("Overspending");
            for category in &analysis.overspending_categories {
                println!("  - {category}");
            }
        }
        if !analysis.recommendations.is_empty() {
            print_heading("Recommendations");
            for recommendation in &analysis.recommendations {
                println!("  - {recommendation}");
            }
        }
        if let Some(prediction) = &analysis.next_month_prediction {
            print_heading("Next month");
            println!("{prediction}");
        }
    });
    Ok(())
}

/// Sends one message, or runs an interactive conversation on stdin.
///
/// The conversation stops at end of input, on `exit`, or as soon as the
/// session ends.
pub async fn chat(ctx: &Context, message: Option<String>) -> Result<(), CliError> {
    match message {
        Some(message) => {
            let history = vec![ChatMessage::user(message)];
            let reply = ctx
                .protected(async {
                    ctx.api()
                        .assistant()
                        .chat(&history)
                        .await
                        .map_err(request_failed)
                })
                .await?;
            output::print(&reply, ctx.format(), |reply| println!("{}", reply.message));
            Ok(())
        }
        None => ctx.protected(conversation(ctx)).await,
    }
}

async fn conversation(ctx: &Context) -> Result<(), CliError> {
    let assistant = ctx.api().assistant();
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if ctx.format() == OutputFormat::Text {
        println!("Ask about your spending. Type `exit` to leave.");
    }

    loop {
        prompt();
        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| CliError::input(format!("failed to read input: {e}")))?
        else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&line) {
            break;
        }

        history.push(ChatMessage::user(line));
        let reply = assistant.chat(&history).await.map_err(request_failed)?;
        output::print(&reply, ctx.format(), |reply| println!("{}\n", reply.message));
        history.push(reply.into());
    }
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
