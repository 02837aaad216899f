//! Portfolio state and the one order action the engine may request.

use crate::domain::direction::Direction;
use crate::domain::symbol::Symbol;

pub trait PortfolioPort {
    /// Side currently held, or `None` when flat.
    fn position(&self, symbol: &Symbol) -> Option<Direction>;
    fn has_open_orders(&self, symbol: &Symbol) -> bool;
    /// Close any position in `symbol`.
    fn liquidate(&mut self, symbol: &Symbol);

    fn is_invested(&self, symbol: &Symbol) -> bool {
        self.position(symbol).is_some()
    }
}
