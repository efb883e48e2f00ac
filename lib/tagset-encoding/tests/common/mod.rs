#![allow(dead_code)]

use dhat::HeapStats;
use tagset_encoding::{TagEncoder, TagEncoderExt as _};

pub mod fixtures;

pub fn encode_groups<E>(encoder: &mut E, groups: &[Vec<String>])
where
    E: TagEncoder + ?Sized,
{
    for group in groups {
        encoder.encode_tags(group);
    }
}

#[non_exhaustive]
pub struct MathableHeapStats {
    pub total_blocks: u64,
    pub total_bytes: u64,
    pub max_blocks: usize,
    pub max_bytes: usize,
    pub curr_blocks: usize,
    pub curr_bytes: usize,
}

impl From<HeapStats> for MathableHeapStats {
    fn from(stats: HeapStats) -> Self {
        Self {
            total_blocks: stats.total_blocks,
            total_bytes: stats.total_bytes,
            max_blocks: stats.max_blocks,
            max_bytes: stats.max_bytes,
            curr_blocks: stats.curr_blocks,
            curr_bytes: stats.curr_bytes,
        }
    }
}

impl std::ops::Sub for MathableHeapStats {
    type Output = MathableHeapStats;

    fn sub(self, rhs: MathableHeapStats) -> Self::Output {
        MathableHeapStats {
            total_blocks: self.total_blocks - rhs.total_blocks,
            total_bytes: self.total_bytes - rhs.total_bytes,
            max_blocks: self.max_blocks - rhs.max_blocks,
            max_bytes: self.max_bytes - rhs.max_bytes,
            curr_blocks: self.curr_blocks - rhs.curr_blocks,
            curr_bytes: self.curr_bytes - rhs.curr_bytes,
        }
    }
}
