//! `spendwise recurring ...`

use super::Context;
use crate::error::{CliError, request_failed};
use crate::output::{self, money, print_row};
use spendwise_api::{RecurringDraft, RecurringExpense};
use spendwise_core::{RecurringExpenseId, Result};

fn summary(charge: &RecurringExpense) -> String {
    let next = charge
        .next_due_date
        .map(|d| format!(", next {d}"))
        .unwrap_or_default();
    let paused = if charge.active { "" } else { " (paused)" };
    format!(
        "{:>6}  {:>10} {:<8} {} [{}]{next}{paused}",
        charge.id.to_string(),
        money(charge.amount),
        charge.frequency.to_string(),
        charge.description,
        charge.category,
    )
}

pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let charges = ctx
        .protected(async { ctx.api().recurring().list().await.map_err(request_failed) })
        .await?;

    output::print_list(&charges, ctx.format(), "No recurring charges.", summary);
    Ok(())
}

pub async fn add(ctx: &Context, draft: RecurringDraft) -> Result<(), CliError> {
    if !(draft.amount.is_finite() && draft.amount > 0.0) {
        return Err(CliError::input("amount must be greater than zero").into());
    }
    if draft.description.trim().is_empty() {
        return Err(CliError::input("description is required").into());
    }

    let charge = ctx
        .protected(async {
            ctx.api()
                .recurring()
                .add(&draft)
                .await
                .map_err(request_failed)
        })
        .await?;

    output::print(&charge, ctx.format(), |charge| {
        println!("Added recurring charge {}", charge.id);
        print_row("Description", &charge.description);
        print_row("Amount", &money(charge.amount));
        print_row("Frequency", &charge.frequency.to_string());
        print_row("Starts", &charge.start_date.to_string());
    });
    Ok(())
}

pub async fn delete(ctx: &Context, id: RecurringExpenseId) -> Result<(), CliError> {
    ctx.protected(async {
        ctx.api()
            .recurring()
            .delete(id)
            .await
            .map_err(request_failed)
    })
    .await?;

    output::print_success(&format!("Deleted recurring charge {id}"), ctx.format());
    Ok(())
}
