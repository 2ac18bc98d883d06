//! Symbol trie with greedy longest match and backtracking
//!
//! Nodes live in an arena; each keeps its parent index so the matched text can
//! be rebuilt from the node alone. A node is `valid` when the path to it was
//! registered as a symbol. Registering `<>` makes `<` valid (every first
//! character is a symbol on its own) but not any other intermediate prefix.

use super::scanner::Scanner;
use super::token::TokenType;
use std::collections::HashMap;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct SymbolNode {
    ch: char,
    parent: Option<usize>,
    children: HashMap<char, usize>,
    valid: bool,
    kind: TokenType,
}

impl SymbolNode {
    fn new(ch: char, parent: Option<usize>) -> Self {
        Self {
            ch,
            parent,
            children: HashMap::new(),
            valid: false,
            kind: TokenType::Symbol,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTree {
    nodes: Vec<SymbolNode>,
}

impl SymbolTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![SymbolNode::new('\0', None)],
        }
    }

    /// Register a multi-character symbol
    pub fn add(&mut self, symbol: &str, kind: TokenType) {
        let mut current = ROOT;
        let mut first = true;

        for ch in symbol.chars() {
            current = self.ensure_child(current, ch);
            if first {
                let node = &mut self.nodes[current];
                if !node.valid {
                    node.valid = true;
                    node.kind = TokenType::Symbol;
                }
                first = false;
            }
        }

        if current != ROOT {
            let node = &mut self.nodes[current];
            node.valid = true;
            node.kind = kind;
        }
    }

    fn ensure_child(&mut self, parent: usize, ch: char) -> usize {
        if let Some(&index) = self.nodes[parent].children.get(&ch) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(SymbolNode::new(ch, Some(parent)));
        self.nodes[parent].children.insert(ch, index);
        index
    }

    /// Consume the longest registered symbol at the scanner position
    ///
    /// The first character is always consumed. Returns the matched text and
    /// its kind; an unregistered first character comes back as a one-char
    /// Symbol.
    pub fn next_symbol(&self, scanner: &mut dyn Scanner) -> Option<(String, TokenType)> {
        let first = scanner.read()?;

        let Some(&start) = self.nodes[ROOT].children.get(&first) else {
            return Some((first.to_string(), TokenType::Symbol));
        };

        let deepest = self.deepest_read(start, scanner);
        let matched = self.unread_to_valid(deepest, start, scanner);
        let node = &self.nodes[matched];

        Some((self.ancestry(matched), node.kind))
    }

    /// Follow children as far as the input allows
    fn deepest_read(&self, start: usize, scanner: &mut dyn Scanner) -> usize {
        let mut current = start;

        while let Some(ch) = scanner.peek() {
            match self.nodes[current].children.get(&ch) {
                Some(&child) => {
                    scanner.read();
                    current = child;
                }
                None => break,
            }
        }

        current
    }

    /// Walk back toward `start`, pushing characters back, until a valid node
    fn unread_to_valid(&self, deepest: usize, start: usize, scanner: &mut dyn Scanner) -> usize {
        let mut current = deepest;

        while current != start && !self.nodes[current].valid {
            scanner.unread();
            current = self.nodes[current].parent.unwrap_or(start);
        }

        current
    }

    fn ancestry(&self, index: usize) -> String {
        let mut chars = Vec::new();
        let mut current = Some(index);

        while let Some(i) = current {
            if i == ROOT {
                break;
            }
            chars.push(self.nodes[i].ch);
            current = self.nodes[i].parent;
        }

        chars.iter().rev().collect()
    }
}

impl Default for SymbolTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::scanner::StringScanner;

    fn drain(tree: &SymbolTree, text: &str) -> Vec<String> {
        let mut scanner = StringScanner::new(text);
        let mut out = Vec::new();
        while let Some((symbol, _)) = tree.next_symbol(&mut scanner) {
            out.push(symbol);
        }
        out
    }

    #[test]
    fn test_longest_match_with_backtrack() {
        let mut tree = SymbolTree::new();
        tree.add("<", TokenType::Symbol);
        tree.add("<<", TokenType::Symbol);
        tree.add("<>", TokenType::Symbol);

        assert_eq!(drain(&tree, "<<<"), vec!["<<", "<"]);
    }

    #[test]
    fn test_unwinds_past_invalid_prefix() {
        let mut tree = SymbolTree::new();
        tree.add("=!=", TokenType::Symbol);

        // "=!" is a prefix but not a symbol, so only "=" matches
        assert_eq!(drain(&tree, "=!x"), vec!["=", "!", "x"]);
        assert_eq!(drain(&tree, "=!="), vec!["=!="]);
    }

    #[test]
    fn test_first_character_is_always_valid() {
        let mut tree = SymbolTree::new();
        tree.add("<>", TokenType::Symbol);

        assert_eq!(drain(&tree, "<="), vec!["<", "="]);
    }

    #[test]
    fn test_unregistered_character() {
        let tree = SymbolTree::new();
        let mut scanner = StringScanner::new("~");

        assert_eq!(
            tree.next_symbol(&mut scanner),
            Some(("~".to_string(), TokenType::Symbol))
        );
        assert_eq!(tree.next_symbol(&mut scanner), None);
    }

    #[test]
    fn test_custom_kind() {
        let mut tree = SymbolTree::new();
        tree.add("::", TokenType::Special);

        let mut scanner = StringScanner::new("::");
        assert_eq!(
            tree.next_symbol(&mut scanner),
            Some(("::".to_string(), TokenType::Special))
        );
    }
}
