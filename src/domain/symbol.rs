//! Symbol identifiers and symbol-list parsing.

use std::collections::HashSet;
use std::fmt;

/// Opaque identifier for a tradable instrument. Always stored trimmed and uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Symbol(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Symbol::new(raw)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SymbolListError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Parse a comma-separated symbol list, rejecting blanks and duplicates.
pub fn parse_symbols(input: &str) -> Result<Vec<Symbol>, SymbolListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SymbolListError::EmptyToken);
        }
        let symbol = Symbol::new(trimmed);
        if !seen.insert(symbol.clone()) {
            return Err(SymbolListError::DuplicateSymbol(symbol.0));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_normalized() {
        assert_eq!(Symbol::new("  hood ").as_str(), "HOOD");
        assert_eq!(Symbol::from("ms"), Symbol::new("MS"));
    }

    #[test]
    fn parse_symbols_basic() {
        let result = parse_symbols("MS, hood ,DAL").unwrap();
        assert_eq!(
            result,
            vec![Symbol::new("MS"), Symbol::new("HOOD"), Symbol::new("DAL")]
        );
    }

    #[test]
    fn parse_symbols_empty_token() {
        assert!(matches!(
            parse_symbols("MS,,DAL"),
            Err(SymbolListError::EmptyToken)
        ));
    }

    #[test]
    fn parse_symbols_duplicate() {
        let result = parse_symbols("MS,DAL,ms");
        assert!(matches!(result, Err(SymbolListError::DuplicateSymbol(s)) if s == "MS"));
    }
}
