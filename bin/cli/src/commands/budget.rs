//! `spendwise budget ...`

use super::Context;
use crate::error::{CliError, request_failed};
use crate::output::{self, money, print_row};
use spendwise_api::{Budget, BudgetRequest};
use spendwise_core::Result;

fn details(budget: &Budget) {
    print_row("Month", &format!("{:04}-{:02}", budget.year, budget.month));
    print_row("Limit", &money(budget.monthly_limit));
    print_row("Spent", &money(budget.total_spent));
    print_row("Remaining", &money(budget.remaining_amount));
    print_row("Used", &format!("{:.1}%", budget.usage_percentage));
    if budget.exceeded {
        println!("  Budget exceeded!");
    }
}

fn validate_month(month: u32) -> Result<(), CliError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CliError::input(format!("month must be between 1 and 12, got {month}")).into())
    }
}

pub async fn current(ctx: &Context) -> Result<(), CliError> {
    let budget = ctx
        .protected(async { ctx.api().budgets().current().await.map_err(request_failed) })
        .await?;

    output::print(&budget, ctx.format(), details);
    Ok(())
}

pub async fn show(ctx: &Context, month: u32, year: i32) -> Result<(), CliError> {
    validate_month(month)?;
    let budget = ctx
        .protected(async {
            ctx.api()
                .budgets()
                .for_month(month, year)
                .await
                .map_err(request_failed)
        })
        .await?;

    output::print(&budget, ctx.format(), details);
    Ok(())
}

/// Sets the limit for `month`, or for the current month when absent.
pub async fn set(ctx: &Context, limit: f64, month: Option<(u32, i32)>) -> Result<(), CliError> {
    if !(limit.is_finite() && limit > 0.0) {
        return Err(CliError::input("limit must be greater than zero").into());
    }
    let request = match month {
        Some((month, year)) => {
            validate_month(month)?;
            BudgetRequest::for_month(limit, month, year)
        }
        None => BudgetRequest::current(limit),
    };

    let budget = ctx
        .protected(async {
            ctx.api()
                .budgets()
                .set(&request)
                .await
                .map_err(request_failed)
        })
        .await?;

    output::print(&budget, ctx.format(), |budget| {
        println!("Budget set");
        details(budget);
    });
    Ok(())
}

pub async fn delete(ctx: &Context, month: u32, year: i32) -> Result<(), CliError> {
    validate_month(month)?;
    ctx.protected(async {
        ctx.api()
            .budgets()
            .delete(month, year)
            .await
            .map_err(request_failed)
    })
    .await?;

    output::print_success(
        &format!("Deleted budget for {year:04}-{month:02}"),
        ctx.format(),
    );
    Ok(())
}
