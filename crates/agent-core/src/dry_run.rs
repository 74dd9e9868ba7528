//! ============================================================================
//! Dry-Run Builder - Transaction Previews
//! ============================================================================
//! Composes the human-readable preview and risk classification shown before
//! any monetary action executes. Pure composition over the classifier's
//! judgment plus live balance/gas data; nothing here mutates state.
//! ============================================================================

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::clients::IntentClassifier;
use crate::error::AgentError;
use crate::types::{DryRunSummary, RiskLevel, TokenType};

/// Builds dry-run previews for stake, unstake and transfer flows.
pub struct DryRunBuilder {
    classifier: Arc<dyn IntentClassifier>,
}

impl DryRunBuilder {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self { classifier }
    }

    /// Compose a preview for one prospective transaction. `recipient` is
    /// the destination shown to the user ("Staking Pool" for stakes, the
    /// user's own address for unstakes).
    pub async fn build(
        &self,
        action: &str,
        recipient: &str,
        amount_base_units: &str,
        token: TokenType,
        sender_balance: u128,
        estimated_gas_mist: u64,
    ) -> Result<DryRunSummary, AgentError> {
        let fields = json!({
            "recipient": recipient,
            "amount": amount_base_units,
            "token": token.symbol(),
        });

        let summary = self
            .classifier
            .dry_run_summary(action, &fields, sender_balance, estimated_gas_mist)
            .await?;

        debug!(
            "Dry run for {}: risk={:?}, gas={} SUI",
            action, summary.risk_level, summary.estimated_gas_fee
        );
        Ok(summary)
    }
}

/// The only gate the dispatcher applies: `high` risk blocks unattended
/// execution of transfers and stakes. Every other action is insulated
/// from the risk level.
pub fn blocks_execution(risk: RiskLevel) -> bool {
    risk == RiskLevel::High
}
