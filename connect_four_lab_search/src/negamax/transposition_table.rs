use crate::transposition_table::{CacheTable, Priority};
use crate::{Board, HashValue, SearchError};

/// Negamax value from the perspective of the side to move: -1, 0 or 1.
pub type Value = i8;

pub const DEFAULT_SIZE_MB: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    /// Stored for collision detection.
    pub board: Board,
    pub value: Value,
    pub depth: u8,
}

impl Priority for TTEntry {
    #[inline]
    fn priority(&self) -> u8 {
        self.depth
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TTKey(pub HashValue);

/// Result of probing the table at a required depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Miss,
    /// Present but searched shallower than required.
    Stale,
    Hit(Value),
}

pub struct TT {
    table: CacheTable<TTKey, TTEntry>,
}

impl std::fmt::Debug for TT {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TT").field(&self.table).finish()
    }
}

impl Default for TT {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_MB)
    }
}

#[inline]
fn check_collision(key: TTKey, entry: &TTEntry, board: &Board) -> Result<(), SearchError> {
    if entry.board != *board {
        return Err(SearchError::HashCollision {
            hash: key.0,
            stored: Box::new(entry.board),
            current: Box::new(*board),
        });
    }
    Ok(())
}

impl TT {
    pub fn new(size_mb: usize) -> Self {
        Self {
            table: CacheTable::new(size_mb),
        }
    }

    pub fn lookup(&self, key: TTKey, board: &Board, required_depth: u8) -> Result<Probe, SearchError> {
        let Some(entry) = self.table.get(&key) else {
            return Ok(Probe::Miss);
        };
        check_collision(key, entry, board)?;
        if entry.depth < required_depth {
            return Ok(Probe::Stale);
        }
        Ok(Probe::Hit(entry.value))
    }

    /// Returns whether the table was written to.
    pub fn store(&mut self, key: TTKey, board: &Board, value: Value, depth: u8) -> Result<bool, SearchError> {
        if let Some(entry) = self.table.get(&key) {
            check_collision(key, entry, board)?;
        }
        let entry = TTEntry {
            board: *board,
            value,
            depth,
        };
        Ok(self.table.replace_if(&key, entry, |prev| prev.depth < depth))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn occupancy(&self) -> f64 {
        self.table.occupancy()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }
}
