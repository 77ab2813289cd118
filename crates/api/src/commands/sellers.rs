//! Seller directory and notification outbox commands

use agenda_domain::{OutboxMessage, Result, Seller};

use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

/// Register or update a seller's notification address.
pub async fn register_seller(ctx: &AppContext, id: String, email: Option<String>) -> Result<()> {
    execute_logged("sellers::register_seller", move || async move {
        ctx.sellers.register_seller(&Seller { id, email }).await
    })
    .await
}

/// Queued notifications not yet delivered, oldest first.
pub async fn list_pending_notifications(
    ctx: &AppContext,
    limit: usize,
) -> Result<Vec<OutboxMessage>> {
    execute_logged("sellers::list_pending_notifications", move || async move {
        ctx.outbox.pending_notifications(limit).await
    })
    .await
}
