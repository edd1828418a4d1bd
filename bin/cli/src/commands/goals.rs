//! `spendwise goals ...`

use super::Context;
use crate::error::{CliError, request_failed};
use crate::output::{self, money, print_row};
use chrono::NaiveDate;
use spendwise_api::{GoalDraft, SavingsGoal};
use spendwise_core::{GoalId, Result};

/// Fields to change on an existing goal. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct GoalChanges {
    pub name: Option<String>,
    pub target: Option<f64>,
    pub current: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub icon: Option<String>,
}

impl GoalChanges {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.target.is_none()
            && self.current.is_none()
            && self.deadline.is_none()
            && self.icon.is_none()
    }

    fn apply(self, goal: &SavingsGoal) -> GoalDraft {
        let mut draft = GoalDraft::from(goal);
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(target) = self.target {
            draft.target_amount = target;
        }
        if let Some(current) = self.current {
            draft.current_amount = current;
        }
        if let Some(deadline) = self.deadline {
            draft.deadline = Some(deadline);
        }
        if let Some(icon) = self.icon {
            draft.icon = Some(icon).filter(|i| !i.is_empty());
        }
        draft
    }
}

fn validate(draft: &GoalDraft) -> Result<(), CliError> {
    if draft.name.trim().is_empty() {
        return Err(CliError::input("goal name is required").into());
    }
    if !(draft.target_amount.is_finite() && draft.target_amount > 0.0) {
        return Err(CliError::input("target must be greater than zero").into());
    }
    if !(draft.current_amount.is_finite() && draft.current_amount >= 0.0) {
        return Err(CliError::input("current amount cannot be negative").into());
    }
    Ok(())
}

fn summary(goal: &SavingsGoal) -> String {
    let icon = goal.icon.as_deref().map(|i| format!("{i} ")).unwrap_or_default();
    let deadline = goal
        .deadline
        .map(|d| format!(" by {d}"))
        .unwrap_or_default();
    format!(
        "{:>6}  {icon}{}: {} / {} ({:.0}%){deadline}",
        goal.id.to_string(),
        goal.name,
        money(goal.current_amount),
        money(goal.target_amount),
        goal.progress_percent()
    )
}

fn details(goal: &SavingsGoal) {
    print_row("Id", &goal.id.to_string());
    print_row("Name", &goal.name);
    print_row("Saved", &money(goal.current_amount));
    print_row("Target", &money(goal.target_amount));
    print_row("Progress", &format!("{:.0}%", goal.progress_percent()));
    if let Some(deadline) = goal.deadline {
        print_row("Deadline", &deadline.to_string());
    }
}

pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let goals = ctx
        .protected(async { ctx.api().goals().list().await.map_err(request_failed) })
        .await?;

    output::print_list(&goals, ctx.format(), "No savings goals yet.", summary);
    Ok(())
}

pub async fn add(ctx: &Context, draft: GoalDraft) -> Result<(), CliError> {
    validate(&draft)?;
    let goal = ctx
        .protected(async {
            ctx.api()
                .goals()
                .create(&draft)
                .await
                .map_err(request_failed)
        })
        .await?;

    output::print(&goal, ctx.format(), |goal| {
        println!("Created goal {}", goal.id);
        details(goal);
    });
    Ok(())
}

/// Changes some fields of a goal, keeping the rest.
///
/// There is no endpoint for a single goal, so the current record is looked
/// up in the list.
pub async fn update(ctx: &Context, id: GoalId, changes: GoalChanges) -> Result<(), CliError> {
    if changes.is_empty() {
        return Err(CliError::input("nothing to update").into());
    }

    let goal = ctx
        .protected(async {
            let goals = ctx.api().goals();
            let current = goals
                .list()
                .await
                .map_err(request_failed)?
                .into_iter()
                .find(|goal| goal.id == id)
                .ok_or_else(|| CliError::Request {
                    message: format!("no savings goal with id {id}"),
                })?;

            let draft = changes.apply(&current);
            validate(&draft)?;
            goals.update(id, &draft).await.map_err(request_failed)
        })
        .await?;

    output::print(&goal, ctx.format(), |goal| {
        println!("Updated goal {}", goal.id);
        details(goal);
    });
    Ok(())
}

pub async fn delete(ctx: &Context, id: GoalId) -> Result<(), CliError> {
    ctx.protected(async { ctx.api().goals().delete(id).await.map_err(request_failed) })
        .await?;

    output::print_success(&format!("Deleted goal {id}"), ctx.format());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car() -> SavingsGoal {
        SavingsGoal {
            id: GoalId::from(3),
            name: "Car".to_string(),
            target_amount: 5000.0,
            current_amount: 1250.0,
            deadline: None,
            icon: Some("🚗".to_string()),
        }
    }

    #[test]
    fn changes_keep_untouched_fields() {
        let changes = GoalChanges {
            current: Some(1500.0),
            ..GoalChanges::default()
        };

        let draft = changes.apply(&car());

        assert_eq!(draft.name, "Car");
        assert_eq!(draft.target_amount, 5000.0);
        assert_eq!(draft.current_amount, 1500.0);
        assert_eq!(draft.icon.as_deref(), Some("🚗"));
    }

    #[test]
    fn rejects_unusable_drafts() {
        assert!(validate(&GoalDraft::new(" ", 10.0)).is_err());
        assert!(validate(&GoalDraft::new("Trip", 0.0)).is_err());

        let mut negative = GoalDraft::new("Trip", 10.0);
        negative.current_amount = -1.0;
        assert!(validate(&negative).is_err());

        assert!(validate(&GoalDraft::new("Trip", 10.0)).is_ok());
    }

    #[test]
    fn summary_shows_progress() {
        assert_eq!(summary(&car()), "     3  🚗 Car: 1250.00 / 5000.00 (25%)");
    }
}
