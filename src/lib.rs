pub mod block;
pub mod chain;
pub mod error;
pub mod logging;

pub use block::{compute_hash, Block, BlockHash};
pub use chain::{Chain, GENESIS_PAYLOAD};
pub use error::{ChainError, Result};
