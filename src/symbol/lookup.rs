use super::Symbol;
use crate::error::{Error, Result};
use crate::util;

/// Child slots cover the identifier alphabet in ascii order:
/// `0`..`9`, `A`..`Z`, `_`, `a`..`z`.
const CHILDREN_WIDTH: usize = 10 + 26 + 1 + 26;

/// An efficient prefix tree mapping identifier names to [`Symbol`]s.
///
/// A node may hold a symbol and still own children, so overlapping names
/// like `sin` and `sinh` coexist. Lookup is greedy: it consumes the maximal
/// run of identifier characters before checking for a value, so `sin1`
/// misses even when `sin` is registered.
#[derive(Debug, Default)]
pub struct SymbolLookup {
    root: Node,
}

#[derive(Debug)]
struct Node {
    symbol: Option<Symbol>,
    children: [Option<Box<Node>>; CHILDREN_WIDTH],
}

impl Default for Node {
    fn default() -> Self {
        Node {
            symbol: None,
            children: std::array::from_fn(|_| None),
        }
    }
}

impl Node {
    fn has_children(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }
}

/// Maps an identifier character to its child slot.
fn slot(c: u8) -> Option<usize> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as usize),
        b'A'..=b'Z' => Some((c - b'A') as usize + 10),
        b'_' => Some(36),
        b'a'..=b'z' => Some((c - b'a') as usize + 37),
        _ => None,
    }
}

fn slot_or_err(c: u8) -> Result<usize> {
    slot(c).ok_or(Error::InvalidSymbolChar(c as char))
}

impl SymbolLookup {
    pub fn new() -> Self {
        SymbolLookup::default()
    }

    /// Inserts a symbol, walking one child per character of its name.
    pub fn insert(&mut self, symbol: Symbol) -> Result<()> {
        let node = self.node_for_insert(symbol.name())?;
        if node.symbol.is_some() {
            return Err(Error::DuplicateSymbol(symbol.name().to_string()));
        }
        node.symbol = Some(symbol);
        Ok(())
    }

    /// Inserts only when the slot is free; returns the prior occupant
    /// unchanged otherwise.
    pub fn insert_if_absent(&mut self, symbol: Symbol) -> Result<Option<Symbol>> {
        let node = self.node_for_insert(symbol.name())?;
        if let Some(existing) = &node.symbol {
            return Ok(Some(existing.clone()));
        }
        node.symbol = Some(symbol);
        Ok(None)
    }

    fn node_for_insert(&mut self, name: &str) -> Result<&mut Node> {
        let mut node = &mut self.root;
        for &c in name.as_bytes() {
            let idx = slot_or_err(c)?;
            node = node.children[idx].get_or_insert_with(Box::default);
        }
        Ok(node)
    }

    /// Looks up a symbol in the scanner's buffer, starting at `pos`.
    ///
    /// Consumes the maximal contiguous run of identifier characters; the
    /// node reached after the full run must hold a value, otherwise this is
    /// a miss (no shortest-prefix fallback).
    pub fn lookup(&self, buf: &[u8], mut pos: usize) -> Option<&Symbol> {
        let mut node = &self.root;
        while pos < buf.len() && util::is_identifier_char(buf[pos]) {
            let idx = slot(buf[pos])?;
            node = node.children[idx].as_deref()?;
            pos += 1;
        }
        node.symbol.as_ref()
    }

    /// Removes a symbol by name, returning it if present.
    ///
    /// A value-holding node that still has children is demoted in place;
    /// a leaf is pruned upward until an ancestor keeps other children or a
    /// value of its own.
    pub fn remove(&mut self, name: &str) -> Option<Symbol> {
        let (removed, _) = Self::remove_walk(&mut self.root, name.as_bytes());
        removed
    }

    fn remove_walk(node: &mut Node, name: &[u8]) -> (Option<Symbol>, bool) {
        let Some((&first, rest)) = name.split_first() else {
            let removed = node.symbol.take();
            let prune = removed.is_some() && !node.has_children();
            return (removed, prune);
        };

        let Some(idx) = slot(first) else {
            return (None, false);
        };
        let Some(child) = node.children[idx].as_deref_mut() else {
            return (None, false);
        };

        let (removed, prune_child) = Self::remove_walk(child, rest);
        if prune_child {
            node.children[idx] = None;
            // keep pruning unless this node is still useful
            let prune = removed.is_some() && node.symbol.is_none() && !node.has_children();
            return (removed, prune);
        }
        (removed, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Variable;

    fn var(name: &str, value: f64) -> Symbol {
        Symbol::Variable(Variable::new(name, value).unwrap())
    }

    fn lookup_value(lookup: &SymbolLookup, input: &str) -> Option<f64> {
        match lookup.lookup(input.as_bytes(), 0)? {
            Symbol::Variable(variable) => Some(variable.value()),
            Symbol::Function(_) => None,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("pi", 3.14)).unwrap();
        lookup.insert(var("e", 2.71)).unwrap();

        assert_eq!(lookup_value(&lookup, "pi"), Some(3.14));
        assert_eq!(lookup_value(&lookup, "e"), Some(2.71));
        assert!(lookup.lookup(b"tau", 0).is_none());
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("x", 1.0)).unwrap();
        assert_eq!(
            lookup.insert(var("x", 2.0)),
            Err(Error::DuplicateSymbol("x".to_string()))
        );
        // the original mapping is untouched
        assert_eq!(lookup_value(&lookup, "x"), Some(1.0));
    }

    #[test]
    fn test_overlapping_prefixes() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("sin", 1.0)).unwrap();
        lookup.insert(var("sinh", 2.0)).unwrap();

        assert_eq!(lookup_value(&lookup, "sin"), Some(1.0));
        assert_eq!(lookup_value(&lookup, "sinh"), Some(2.0));
    }

    #[test]
    fn test_greedy_consumption() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("sin", 1.0)).unwrap();

        // the scan consumes the whole run before checking for a value, so a
        // registered prefix does not match
        assert!(lookup.lookup(b"sin1", 0).is_none());
        assert!(lookup.lookup(b"sinx", 0).is_none());
        assert!(lookup.lookup(b"si", 0).is_none());
        // a non-identifier char ends the run, so these match
        assert_eq!(lookup_value(&lookup, "sin(1)"), Some(1.0));
        assert_eq!(lookup_value(&lookup, "sin+1"), Some(1.0));
    }

    #[test]
    fn test_lookup_mid_buffer() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("x", 7.0)).unwrap();

        let buf = b"1+x*2";
        match lookup.lookup(buf, 2) {
            Some(Symbol::Variable(variable)) => assert_eq!(variable.value(), 7.0),
            other => panic!("expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_underscore_and_case() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("_a", 1.0)).unwrap();
        lookup.insert(var("a_00__1", 2.0)).unwrap();
        lookup.insert(var("xA3", 3.0)).unwrap();

        assert_eq!(lookup_value(&lookup, "_a"), Some(1.0));
        assert_eq!(lookup_value(&lookup, "a_00__1"), Some(2.0));
        assert_eq!(lookup_value(&lookup, "xA3"), Some(3.0));
        // case matters
        assert!(lookup.lookup(b"xa3", 0).is_none());
    }

    #[test]
    fn test_remove_leaf_prunes() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("abc", 1.0)).unwrap();

        assert!(lookup.remove("abc").is_some());
        assert!(lookup.lookup(b"abc", 0).is_none());
        assert!(!lookup.root.has_children());
        // removing again is a no-op
        assert!(lookup.remove("abc").is_none());
    }

    #[test]
    fn test_remove_demotes_inner_node() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("sin", 1.0)).unwrap();
        lookup.insert(var("sinh", 2.0)).unwrap();

        assert!(lookup.remove("sin").is_some());
        assert!(lookup.lookup(b"sin", 0).is_none());
        assert_eq!(lookup_value(&lookup, "sinh"), Some(2.0));
    }

    #[test]
    fn test_remove_prunes_up_to_value_holding_ancestor() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("sin", 1.0)).unwrap();
        lookup.insert(var("sinh", 2.0)).unwrap();

        assert!(lookup.remove("sinh").is_some());
        assert_eq!(lookup_value(&lookup, "sin"), Some(1.0));
        // the 'h' node is gone but 'sin' still resolves
        assert!(lookup.lookup(b"sinh", 0).is_none());

        // re-inserting after a prune works
        lookup.insert(var("sinh", 4.0)).unwrap();
        assert_eq!(lookup_value(&lookup, "sinh"), Some(4.0));
    }

    #[test]
    fn test_remove_missing_name() {
        let mut lookup = SymbolLookup::new();
        lookup.insert(var("abc", 1.0)).unwrap();
        assert!(lookup.remove("ab").is_none());
        assert!(lookup.remove("abcd").is_none());
        assert!(lookup.remove("not-a-name").is_none());
        assert_eq!(lookup_value(&lookup, "abc"), Some(1.0));
    }

    #[test]
    fn test_insert_if_absent() {
        let mut lookup = SymbolLookup::new();
        assert!(lookup.insert_if_absent(var("x", 1.0)).unwrap().is_none());

        let prior = lookup.insert_if_absent(var("x", 2.0)).unwrap();
        assert!(matches!(
            prior,
            Some(Symbol::Variable(ref variable)) if variable.value() == 1.0
        ));
        // the prior symbol stays mapped
        assert_eq!(lookup_value(&lookup, "x"), Some(1.0));
    }
}
