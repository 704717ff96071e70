//! Trade execution against an account.
//!
//! Trades are sized as fractions of current holdings: a buy spends
//! `fraction * cash`, a sell disposes of `|fraction| * shares`. With the
//! fraction bounded by 1 neither balance can go negative, so there is no
//! affordability check. Fills happen at the given price with no slippage or
//! commission.

use std::fmt;

use super::account::AccountState;
use super::error::SimtraderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub side: Side,
    pub fraction: f64,
    pub price: f64,
    /// Shares bought or sold (always non-negative).
    pub shares: f64,
    /// Signed change to cash: negative for buys, positive for sells.
    pub cash_delta: f64,
}

/// Mutates an account it borrows; holds no balances of its own.
#[derive(Debug)]
pub struct TradeExecutor<'a> {
    account: &'a mut AccountState,
}

impl<'a> TradeExecutor<'a> {
    pub fn new(account: &'a mut AccountState) -> Self {
        TradeExecutor { account }
    }

    pub fn account(&self) -> &AccountState {
        self.account
    }

    /// Spend `fraction` of current cash at `price`. Requires `0 < fraction <= 1`.
    pub fn buy(&mut self, fraction: f64, price: f64) -> Result<Fill, SimtraderError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(SimtraderError::InvalidFraction {
                side: Side::Buy.as_str(),
                fraction,
            });
        }
        check_price(price)?;

        let cost = fraction * self.account.cash();
        let bought = cost / price;
        // A tiny but positive price can push the share count past f64::MAX.
        if !bought.is_finite() {
            return Err(SimtraderError::InvalidPrice { price });
        }

        // Cash first: it is the only balance a buy can push down.
        self.account.set_cash(self.account.cash() - cost)?;
        self.account.set_shares(self.account.shares() + bought)?;

        Ok(Fill {
            side: Side::Buy,
            fraction,
            price,
            shares: bought,
            cash_delta: -cost,
        })
    }

    /// Sell `|fraction|` of the current position at `price`. Requires
    /// `-1 <= fraction < 0`.
    pub fn sell(&mut self, fraction: f64, price: f64) -> Result<Fill, SimtraderError> {
        if !(fraction >= -1.0 && fraction < 0.0) {
            return Err(SimtraderError::InvalidFraction {
                side: Side::Sell.as_str(),
                fraction,
            });
        }
        check_price(price)?;

        let sold = fraction.abs() * self.account.shares();
        let proceeds = sold * price;
        if !proceeds.is_finite() {
            return Err(SimtraderError::InvalidPrice { price });
        }

        self.account.set_shares(self.account.shares() - sold)?;
        self.account.set_cash(self.account.cash() + proceeds)?;

        Ok(Fill {
            side: Side::Sell,
            fraction,
            price,
            shares: sold,
            cash_delta: proceeds,
        })
    }
}

fn check_price(price: f64) -> Result<(), SimtraderError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(SimtraderError::InvalidPrice { price })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn account(cash: f64, shares: f64) -> AccountState {
        let mut account = AccountState::new(cash).unwrap();
        account.set_shares(shares).unwrap();
        account
    }

    #[test]
    fn buy_full_liquidity() {
        let mut acct = account(10_000.0, 0.0);
        let fill = TradeExecutor::new(&mut acct).buy(1.0, 100.0).unwrap();
        assert_eq!(acct.cash(), 0.0);
        assert_eq!(acct.shares(), 100.0);
        assert_eq!(fill.side, Side::Buy);
        assert_eq!(fill.shares, 100.0);
        assert_eq!(fill.cash_delta, -10_000.0);
    }

    #[test]
    fn buy_half_liquidity() {
        let mut acct = account(10_000.0, 0.0);
        TradeExecutor::new(&mut acct).buy(0.5, 100.0).unwrap();
        assert_eq!(acct.cash(), 5_000.0);
        assert_eq!(acct.shares(), 50.0);
    }

    #[test]
    fn sell_whole_position() {
        let mut acct = account(5_000.0, 50.0);
        let fill = TradeExecutor::new(&mut acct).sell(-1.0, 110.0).unwrap();
        assert_eq!(acct.shares(), 0.0);
        assert_eq!(acct.cash(), 10_500.0);
        assert_eq!(fill.shares, 50.0);
        assert_eq!(fill.cash_delta, 5_500.0);
    }

    #[test]
    fn sell_partial_position() {
        let mut acct = account(0.0, 40.0);
        TradeExecutor::new(&mut acct).sell(-0.25, 10.0).unwrap();
        assert_relative_eq!(acct.shares(), 30.0);
        assert_relative_eq!(acct.cash(), 100.0);
    }

    #[test]
    fn buy_rejects_out_of_range_fractions() {
        let mut acct = account(1_000.0, 0.0);
        let mut exec = TradeExecutor::new(&mut acct);
        for fraction in [0.0, -0.5, 1.0001, 2.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    exec.buy(fraction, 10.0),
                    Err(SimtraderError::InvalidFraction { side: "buy", .. })
                ),
                "fraction {fraction} should be rejected"
            );
        }
        assert_eq!(acct.cash(), 1_000.0);
    }

    #[test]
    fn sell_rejects_out_of_range_fractions() {
        let mut acct = account(0.0, 10.0);
        let mut exec = TradeExecutor::new(&mut acct);
        for fraction in [0.0, 0.5, -1.0001, -2.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(
                matches!(
                    exec.sell(fraction, 10.0),
                    Err(SimtraderError::InvalidFraction { side: "sell", .. })
                ),
                "fraction {fraction} should be rejected"
            );
        }
        assert_eq!(acct.shares(), 10.0);
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut acct = account(1_000.0, 10.0);
        let mut exec = TradeExecutor::new(&mut acct);
        assert!(matches!(
            exec.buy(0.5, 0.0),
            Err(SimtraderError::InvalidPrice { .. })
        ));
        assert!(matches!(
            exec.sell(-0.5, -3.0),
            Err(SimtraderError::InvalidPrice { .. })
        ));
        assert!(exec.buy(0.5, f64::NAN).is_err());
    }

    #[test]
    fn subnormal_price_rejected_without_change() {
        let mut acct = account(10_000.0, 0.0);
        let mut exec = TradeExecutor::new(&mut acct);
        assert!(matches!(
            exec.buy(1.0, 1e-310),
            Err(SimtraderError::InvalidPrice { .. })
        ));
        assert_eq!(acct.cash(), 10_000.0);
        assert_eq!(acct.shares(), 0.0);
    }

    #[test]
    fn overflowing_proceeds_rejected_without_change() {
        let mut acct = account(0.0, 1e300);
        let mut exec = TradeExecutor::new(&mut acct);
        assert!(matches!(
            exec.sell(-1.0, 1e100),
            Err(SimtraderError::InvalidPrice { .. })
        ));
        assert_eq!(acct.shares(), 1e300);
        assert_eq!(acct.cash(), 0.0);
    }

    #[test]
    fn degenerate_trades_succeed_as_no_ops() {
        let mut acct = account(0.0, 0.0);
        let mut exec = TradeExecutor::new(&mut acct);
        let buy = exec.buy(1.0, 50.0).unwrap();
        let sell = exec.sell(-1.0, 50.0).unwrap();
        assert_eq!(buy.shares, 0.0);
        assert_eq!(sell.shares, 0.0);
        assert_eq!(exec.account().cash(), 0.0);
        assert_eq!(exec.account().shares(), 0.0);
    }

    proptest! {
        #[test]
        fn balances_never_negative(
            cash in 0.0f64..1e9,
            shares in 0.0f64..1e6,
            trades in prop::collection::vec((-1.0f64..=1.0, 0.01f64..1e4), 1..50),
        ) {
            let mut acct = account(cash, shares);
            let mut exec = TradeExecutor::new(&mut acct);
            for (fraction, price) in trades {
                if fraction > 0.0 {
                    exec.buy(fraction, price).unwrap();
                } else if fraction < 0.0 {
                    exec.sell(fraction, price).unwrap();
                }
                prop_assert!(exec.account().cash() >= 0.0);
                prop_assert!(exec.account().shares() >= 0.0);
            }
        }

        #[test]
        fn trades_preserve_value_at_fill_price(
            cash in 1.0f64..1e6,
            fraction in 0.001f64..=1.0,
            price in 0.01f64..1e4,
        ) {
            let mut acct = account(cash, 0.0);
            TradeExecutor::new(&mut acct).buy(fraction, price).unwrap();
            prop_assert!((acct.valuation(price) - cash).abs() <= cash * 1e-9);
        }
    }
}
