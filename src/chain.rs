use crate::block::Block;
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, warn};

/// Payload of the first block of every chain.
pub const GENESIS_PAYLOAD: &[u8] = b"Genesis Block";

/// An append-only sequence of hash-linked blocks.
///
/// Index 0 is always the genesis block, whose `prev_hash` is empty. Every
/// later block's `prev_hash` equals the hash of the block before it. Blocks
/// are only ever handed out by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain holding only the genesis block.
    pub fn new() -> Self {
        let genesis = Block::new(GENESIS_PAYLOAD.to_vec(), Vec::new());
        debug!(hash = %genesis.short_hash(), "created genesis block");
        Self {
            blocks: vec![genesis],
        }
    }

    /// Append a block carrying `payload`, linked to the current tip.
    pub fn append(&mut self, payload: impl Into<Vec<u8>>) -> &Block {
        let prev_hash = self.tip().hash.clone();
        let block = Block::new(payload.into(), prev_hash);
        debug!(
            index = self.blocks.len(),
            hash = %block.short_hash(),
            "appended block"
        );
        self.blocks.push(block);
        self.tip()
    }

    /// All blocks, genesis first.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// The most recently appended block.
    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks, including genesis.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a chain holds at least its genesis block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Check every block's hash, the genesis rule and each predecessor link.
    ///
    /// Reports the first failing block.
    pub fn verify(&self) -> Result<()> {
        verify_blocks(&self.blocks)
    }

    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    /// Write every block, genesis first, with a blank line after each one.
    pub fn write_text(&self, w: &mut impl Write) -> std::io::Result<()> {
        for block in &self.blocks {
            writeln!(w, "{}", block)?;
        }
        Ok(())
    }

    /// Pretty-printed JSON array of the blocks.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON array of blocks; fails unless the blocks form a valid chain.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Import a block sequence, rejecting it unless it forms a valid chain.
impl TryFrom<Vec<Block>> for Chain {
    type Error = ChainError;

    fn try_from(blocks: Vec<Block>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        verify_blocks(&blocks)?;
        Ok(Self { blocks })
    }
}

impl From<Chain> for Vec<Block> {
    fn from(chain: Chain) -> Self {
        chain.blocks
    }
}

fn verify_blocks(blocks: &[Block]) -> Result<()> {
    let mut prev: Option<&Block> = None;
    for (index, block) in blocks.iter().enumerate() {
        if !block.verify() {
            warn!(index, "block hash does not match its contents");
            return Err(ChainError::HashMismatch { index });
        }
        match prev {
            None if !block.prev_hash.is_empty() => {
                warn!("genesis block has a previous hash");
                return Err(ChainError::InvalidGenesis);
            }
            Some(p) if block.prev_hash != p.hash => {
                warn!(index, "block is not linked to its predecessor");
                return Err(ChainError::BrokenLink { index });
            }
            _ => {}
        }
        prev = Some(block);
    }
    Ok(())
}
