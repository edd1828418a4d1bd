//! `spendwise dashboard` and `spendwise analytics`.

use super::Context;
use crate::error::{CliError, request_failed};
use crate::output::{self, money, print_heading, print_row};
use spendwise_core::Result;
use std::collections::BTreeMap;

fn breakdown(categories: &BTreeMap<String, f64>) {
    if categories.is_empty() {
        println!("  (no spending)");
    }
    for (category, amount) in categories {
        print_row(category, &money(*amount));
    }
}

pub async fn dashboard(ctx: &Context) -> Result<(), CliError> {
    let dashboard = ctx
        .protected(async { ctx.api().insights().dashboard().await.map_err(request_failed) })
        .await?;

    output::print(&dashboard, ctx.format(), |dashboard| {
        print_heading("This month");
        print_row("Spent", &money(dashboard.total_monthly_spending));
        match dashboard.monthly_budget {
            Some(budget) => print_row("Budget", &money(budget)),
            None => print_row("Budget", "not set"),
        }
        if let Some(remaining) = dashboard.remaining_amount {
            print_row("Remaining", &money(remaining));
        }
        if let Some(score) = dashboard.financial_health_score {
            print_row("Health score", &format!("{score}/100"));
        }
        print_heading("By category");
        breakdown(&dashboard.category_breakdown);
    });
    Ok(())
}

pub async fn analytics(ctx: &Context) -> Result<(), CliError> {
    let analytics = ctx
        .protected(async { ctx.api().insights().analytics().await.map_err(request_failed) })
        .await?;

    output::print(&analytics, ctx.format(), |analytics| {
        print_heading("Monthly trend");
        for (month, amount) in &analytics.monthly_trend {
            print_row(month, &money(*amount));
        }
        if let Some(total) = analytics.total_spent {
            print_row("Total", &money(total));
        }
        if let Some(change) = analytics.month_over_month_change {
            print_row("Change vs last month", &format!("{change:+.1}%"));
        }
        print_heading("By category");
        breakdown(&analytics.category_breakdown);
    });
    Ok(())
}
