//! Ordered list of watched symbols.
//!
//! Append-only: symbols are kept in insertion order and duplicates are kept,
//! so watching the same symbol twice yields two records per fetch.
use quote_common::Symbol;

/// Symbols polled on every fetch.
#[derive(Debug, Default, Clone)]
pub struct WatchList {
    symbols: Vec<Symbol>,
}

impl WatchList {
    /// Create an empty watch list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a symbol.
    pub fn push(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    /// Watched symbols in insertion order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_duplicates() {
        let mut list = WatchList::new();
        assert!(list.is_empty());
        list.push(Symbol::new("vti"));
        list.push(Symbol::new("vxus"));
        list.push(Symbol::new("VTI"));

        let names: Vec<&str> = list.symbols().iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["VTI", "VXUS", "VTI"]);
        assert_eq!(list.len(), 3);
    }
}
