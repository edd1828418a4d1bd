//! Typed resource clients for the spendwise expense service.
//!
//! Every client issues its calls through the session's
//! [`ApiGateway`](spendwise_session::ApiGateway), so credentials are attached
//! and revoked sessions are torn down in one place. Failures other than a
//! revocation come back as [`GatewayError`](spendwise_session::GatewayError)
//! reports for the caller to render.

pub mod assistant;
pub mod budget;
pub mod expense;
pub mod goal;
pub mod health;
pub mod insight;
pub mod profile;
pub mod recurring;

#[cfg(test)]
mod testing;

pub use assistant::{AssistantClient, ChatMessage, ChatReply, ChatRole, SpendingAnalysis};
pub use budget::{Budget, BudgetClient, BudgetRequest};
pub use expense::{Expense, ExpenseClient, ExpenseDraft};
pub use goal::{GoalClient, GoalDraft, SavingsGoal};
pub use health::{Health, HealthClient};
pub use insight::{Analytics, Dashboard, InsightClient};
pub use profile::{ProfileClient, ProfileUpdate};
pub use recurring::{Frequency, RecurringClient, RecurringDraft, RecurringExpense};

use spendwise_session::SessionController;

/// Entry point bundling every resource client over one session.
#[derive(Clone)]
pub struct SpendwiseApi {
    session: SessionController,
}

impl SpendwiseApi {
    /// Creates the resource clients for a session.
    #[must_use]
    pub fn new(session: SessionController) -> Self {
        Self { session }
    }

    /// Returns the session the clients call through.
    #[must_use]
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    #[must_use]
    pub fn expenses(&self) -> ExpenseClient {
        ExpenseClient::new(self.session.gateway().clone())
    }

    #[must_use]
    pub fn budgets(&self) -> BudgetClient {
        BudgetClient::new(self.session.gateway().clone())
    }

    #[must_use]
    pub fn goals(&self) -> GoalClient {
        GoalClient::new(self.session.gateway().clone())
    }

    #[must_use]
    pub fn recurring(&self) -> RecurringClient {
        RecurringClient::new(self.session.gateway().clone())
    }

    #[must_use]
    pub fn insights(&self) -> InsightClient {
        InsightClient::new(self.session.gateway().clone())
    }

    #[must_use]
    pub fn assistant(&self) -> AssistantClient {
        AssistantClient::new(self.session.gateway().clone())
    }

    /// Profile edits merge into the session on success.
    #[must_use]
    pub fn profile(&self) -> ProfileClient {
        ProfileClient::new(self.session.clone())
    }

    #[must_use]
    pub fn health(&self) -> HealthClient {
        HealthClient::new(self.session.gateway().clone())
    }
}
