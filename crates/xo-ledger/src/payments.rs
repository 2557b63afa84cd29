use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, LedgerError};

/// Pull-payment balances. Sales credit an account here; funds leave only
/// through an explicit withdrawal that pays the full balance at once.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingPayments {
    pending: BTreeMap<AccountId, Amount>,
    total_credited: Amount,
    total_withdrawn: Amount,
}

impl PendingPayments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account`'s withdrawable balance.
    pub fn credit(&mut self, account: &AccountId, amount: Amount) {
        *self.pending.entry(account.clone()).or_default() += amount;
        self.total_credited += amount;
    }

    /// Pay out and zero `account`'s full pending balance.
    pub fn withdraw_all(&mut self, account: &AccountId) -> Result<Amount, LedgerError> {
        let due = self.pending.get(account).copied().unwrap_or(0);
        if due == 0 {
            return Err(LedgerError::NothingDue {
                account: account.clone(),
            });
        }
        self.pending.insert(account.clone(), 0);
        self.total_withdrawn += due;
        Ok(due)
    }

    /// Current withdrawable balance for `account`.
    pub fn pending_of(&self, account: &str) -> Amount {
        self.pending.get(account).copied().unwrap_or(0)
    }

    /// Credits minus withdrawals; always equals the sum of pending
    /// balances.
    pub fn outstanding(&self) -> Amount {
        self.total_credited - self.total_withdrawn
    }
}
