use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{BuildError, Result};

pub const MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrieNode {
    Leaf { mnemonic: String },
    /// Discriminates on the character at `depth`. `terminal` is the mnemonic
    /// that ends right before `depth`, selected only when the input ends too.
    Branch {
        depth: usize,
        terminal: Option<String>,
        children: Vec<(u8, NodeId)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MnemonicTrie {
    nodes: Vec<TrieNode>,
}

fn is_trie_char(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit()
}

impl MnemonicTrie {
    pub fn build<'a, I>(mnemonics: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set: Vec<&str> = mnemonics.into_iter().collect();
        set.sort_unstable();
        set.dedup();
        if let Some(bad) = set.iter().find(|m| m.is_empty() || !m.bytes().all(is_trie_char)) {
            return Err(BuildError::InvalidMnemonic { mnemonic: bad.to_string() });
        }

        let mut trie = Self { nodes: Vec::new() };
        trie.branch(0, &set)?;
        debug!(mnemonics = set.len(), nodes = trie.nodes.len(), "mnemonic trie built");
        Ok(trie)
    }

    fn branch(&mut self, depth: usize, group: &[&str]) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TrieNode::Branch { depth, terminal: None, children: Vec::new() });

        let terminal = group.iter().find(|m| m.len() == depth).map(|m| m.to_string());
        let rest: Vec<&str> = group.iter().copied().filter(|m| m.len() > depth).collect();

        if depth == MAX_DEPTH && !rest.is_empty() {
            let mut clash = terminal.as_deref().into_iter().chain(rest.iter().copied());
            return Err(match (clash.next(), clash.next()) {
                (Some(first), Some(second)) => BuildError::AmbiguousMnemonic {
                    first: first.to_string(),
                    second: second.to_string(),
                },
                _ => BuildError::InvalidMnemonic { mnemonic: rest[0].to_string() },
            });
        }

        let mut children = Vec::new();
        for part in rest.chunk_by(|a, b| a.as_bytes()[depth] == b.as_bytes()[depth]) {
            let ch = part[0].as_bytes()[depth];
            let child = match part {
                [only] if only.len() <= depth + 1 => {
                    let leaf = NodeId(self.nodes.len());
                    self.nodes.push(TrieNode::Leaf { mnemonic: only.to_string() });
                    leaf
                }
                _ => self.branch(depth + 1, part)?,
            };
            children.push((ch, child));
        }

        self.nodes[id.0] = TrieNode::Branch { depth, terminal, children };
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| match n {
                TrieNode::Leaf { .. } => 1,
                TrieNode::Branch { terminal, .. } => terminal.is_some() as usize,
            })
            .sum()
    }

    pub fn lookup(&self, input: &str) -> Option<&str> {
        let bytes = input.as_bytes();
        let mut id = self.root();
        loop {
            match self.node(id) {
                TrieNode::Leaf { mnemonic } => return (mnemonic == input).then_some(mnemonic.as_str()),
                TrieNode::Branch { depth, terminal, children } => match bytes.get(*depth) {
                    None => return terminal.as_deref(),
                    Some(c) => id = children.iter().find(|(k, _)| k == c)?.1,
                },
            }
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, indent: usize) -> fmt::Result {
        if let TrieNode::Branch { terminal, children, .. } = self.node(id) {
            if let Some(m) = terminal {
                writeln!(f, "{:indent$}<end> -> {m}", "")?;
            }
            for (ch, child) in children {
                match self.node(*child) {
                    TrieNode::Leaf { mnemonic } => writeln!(f, "{:indent$}{} -> {mnemonic}", "", *ch as char)?,
                    TrieNode::Branch { .. } => {
                        writeln!(f, "{:indent$}{}", "", *ch as char)?;
                        self.fmt_node(f, *child, indent + 2)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for MnemonicTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mnemonic_reaches_its_own_leaf() {
        let set = ["lda", "ldx", "ldy", "lsr", "bbr0", "bbr1", "bbs0", "brk"];
        let trie = MnemonicTrie::build(set).unwrap();
        for m in set {
            assert_eq!(trie.lookup(m), Some(m));
        }
        assert_eq!(trie.leaf_count(), set.len());
        assert_eq!(trie.lookup("ld"), None);
        assert_eq!(trie.lookup("ldax"), None);
        assert_eq!(trie.lookup("bbr"), None);
        assert_eq!(trie.lookup("bbr2"), None);
    }

    #[test]
    fn children_sorted_by_character() {
        let trie = MnemonicTrie::build(["tya", "and", "sta", "adc"]).unwrap();
        let TrieNode::Branch { children, .. } = trie.node(trie.root()) else { panic!("root is a branch") };
        let keys: Vec<u8> = children.iter().map(|(c, _)| *c).collect();
        assert_eq!(keys, b"ast".to_vec());
    }

    #[test]
    fn three_char_prefix_of_four_char_is_terminal() {
        let trie = MnemonicTrie::build(["bbr", "bbr0", "bbr1"]).unwrap();
        assert_eq!(trie.lookup("bbr"), Some("bbr"));
        assert_eq!(trie.lookup("bbr0"), Some("bbr0"));
        assert_eq!(trie.lookup("bbr1"), Some("bbr1"));
        assert_eq!(trie.lookup("bbr2"), None);
        let terminal = trie.nodes().iter().find_map(|n| match n {
            TrieNode::Branch { depth: 3, terminal, .. } => terminal.clone(),
            _ => None,
        });
        assert_eq!(terminal.as_deref(), Some("bbr"));
    }

    #[test]
    fn indistinguishable_mnemonics_fail_at_build() {
        let err = MnemonicTrie::build(["abcde", "abcdf"]).unwrap_err();
        assert!(matches!(err, BuildError::AmbiguousMnemonic { ref first, ref second }
            if first == "abcde" && second == "abcdf"));
        let err = MnemonicTrie::build(["abcd", "abcdx"]).unwrap_err();
        assert!(matches!(err, BuildError::AmbiguousMnemonic { .. }));
        let err = MnemonicTrie::build(["abcdx"]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidMnemonic { .. }));
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        assert!(matches!(MnemonicTrie::build(["lda", "LDX"]), Err(BuildError::InvalidMnemonic { .. })));
        assert!(matches!(MnemonicTrie::build([""]), Err(BuildError::InvalidMnemonic { .. })));
    }

    #[test]
    fn display_shows_indented_tree() {
        let trie = MnemonicTrie::build(["inc", "inx", "jmp"]).unwrap();
        let text = trie.to_string();
        assert_eq!(text, "i\n  n\n    c -> inc\n    x -> inx\nj\n  m\n    p -> jmp\n");
    }
}
