//! Account state: cash and position size for a single instrument.
//!
//! Fields are private. After construction the setters are the only write
//! path, and they reject any value below zero or not finite rather than
//! clamping it. `Default` starts from the same state `new` builds for
//! [`DEFAULT_INITIAL_INVESTMENT`].

use super::error::SimtraderError;

pub const DEFAULT_INITIAL_INVESTMENT: f64 = 25_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    initial_investment: f64,
    cash: f64,
    shares: f64,
}

impl AccountState {
    pub fn new(initial_investment: f64) -> Result<Self, SimtraderError> {
        let mut account = AccountState {
            initial_investment,
            cash: 0.0,
            shares: 0.0,
        };
        account.set_cash(initial_investment)?;
        Ok(account)
    }

    pub fn initial_investment(&self) -> f64 {
        self.initial_investment
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn set_cash(&mut self, value: f64) -> Result<(), SimtraderError> {
        self.cash = checked("cash", value)?;
        Ok(())
    }

    pub fn shares(&self) -> f64 {
        self.shares
    }

    pub fn set_shares(&mut self, value: f64) -> Result<(), SimtraderError> {
        self.shares = checked("shares", value)?;
        Ok(())
    }

    /// Mark-to-market worth: cash + shares * price.
    pub fn valuation(&self, price: f64) -> f64 {
        self.cash + self.shares * price
    }
}

impl Default for AccountState {
    fn default() -> Self {
        AccountState {
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            cash: DEFAULT_INITIAL_INVESTMENT,
            shares: 0.0,
        }
    }
}

// Balances must be finite and non-negative; NaN and infinities are refused.
fn checked(field: &'static str, value: f64) -> Result<f64, SimtraderError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimtraderError::NegativeBalance { field, value })
    }
}
