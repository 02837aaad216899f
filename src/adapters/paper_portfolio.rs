//! Paper portfolio for replays: insights become holdings immediately, with no
//! sizing, fills or cash.

use std::collections::BTreeMap;

use crate::domain::direction::Direction;
use crate::domain::insight::{Insight, InsightDirection};
use crate::domain::symbol::Symbol;
use crate::ports::portfolio_port::PortfolioPort;

#[derive(Debug, Default)]
pub struct PaperPortfolio {
    holdings: BTreeMap<Symbol, Direction>,
}

impl PaperPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Up opens or flips to long, Down to short, Flat closes.
    pub fn apply(&mut self, insights: &[Insight]) {
        for insight in insights {
            match insight.direction {
                InsightDirection::Up => {
                    self.holdings.insert(insight.symbol.clone(), Direction::Long);
                }
                InsightDirection::Down => {
                    self.holdings.insert(insight.symbol.clone(), Direction::Short);
                }
                InsightDirection::Flat => {
                    self.holdings.remove(&insight.symbol);
                }
            }
        }
    }

    pub fn holdings(&self) -> impl Iterator<Item = (&Symbol, &Direction)> {
        self.holdings.iter()
    }
}

impl PortfolioPort for PaperPortfolio {
    fn position(&self, symbol: &Symbol) -> Option<Direction> {
        self.holdings.get(symbol).copied()
    }

    fn has_open_orders(&self, _symbol: &Symbol) -> bool {
        false
    }

    fn liquidate(&mut self, symbol: &Symbol) {
        self.holdings.remove(symbol);
    }
}
