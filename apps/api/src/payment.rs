//! Payment gateway abstraction.
//!
//! The production gateway is a stand-in for a real processor: it approves
//! a fixed fraction of charges at random, independent of the input. The
//! outcome is behind a trait so tests can force either branch
//! deterministically.

use chrono::Utc;
use tracing::debug;

/// Result of a charge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The charge went through; the gateway assigned a transaction id.
    Approved { transaction_id: String },
    /// The charge was declined.
    Declined,
}

/// An external payment processor.
///
/// Charges are not idempotent: each call is an independent attempt, and
/// callers must not auto-retry without idempotency keys (none exist in
/// this design).
pub trait PaymentGateway: Send + Sync {
    /// Attempts to charge the given amount.
    fn charge(&self, amount_cents: i64) -> GatewayOutcome;
}

/// Simulated gateway approving charges with a fixed probability.
pub struct SimulatedGateway {
    approval_rate: f64,
}

impl SimulatedGateway {
    /// Creates a gateway with the given approval probability in `[0, 1]`.
    pub fn new(approval_rate: f64) -> Self {
        SimulatedGateway { approval_rate }
    }
}

impl Default for SimulatedGateway {
    /// The storefront contract: 90% of charges succeed.
    fn default() -> Self {
        SimulatedGateway::new(0.9)
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, amount_cents: i64) -> GatewayOutcome {
        if rand::random::<f64>() < self.approval_rate {
            let transaction_id = generate_transaction_id();
            debug!(amount_cents, %transaction_id, "Simulated charge approved");
            GatewayOutcome::Approved { transaction_id }
        } else {
            debug!(amount_cents, "Simulated charge declined");
            GatewayOutcome::Declined
        }
    }
}

/// Deterministic gateway for tests: always approves or always declines.
pub struct FixedGateway {
    approve: bool,
}

impl FixedGateway {
    pub fn approving() -> Self {
        FixedGateway { approve: true }
    }

    pub fn declining() -> Self {
        FixedGateway { approve: false }
    }
}

impl PaymentGateway for FixedGateway {
    fn charge(&self, _amount_cents: i64) -> GatewayOutcome {
        if self.approve {
            GatewayOutcome::Approved {
                transaction_id: generate_transaction_id(),
            }
        } else {
            GatewayOutcome::Declined
        }
    }
}

/// Generates a transaction id in format: `PAY-<millis>-<NNN>`.
fn generate_transaction_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = rand::random::<u16>() % 1000;
    format!("PAY-{millis}-{seq:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_gateway() {
        assert!(matches!(
            FixedGateway::approving().charge(1000),
            GatewayOutcome::Approved { .. }
        ));
        assert_eq!(FixedGateway::declining().charge(1000), GatewayOutcome::Declined);
    }

    #[test]
    fn test_extreme_rates_are_deterministic() {
        assert!(matches!(
            SimulatedGateway::new(1.0).charge(1000),
            GatewayOutcome::Approved { .. }
        ));
        assert_eq!(SimulatedGateway::new(0.0).charge(1000), GatewayOutcome::Declined);
    }

    #[test]
    fn test_transaction_id_format() {
        let id = generate_transaction_id();
        assert!(id.starts_with("PAY-"));
        assert_eq!(id.split('-').count(), 3);
    }
}
