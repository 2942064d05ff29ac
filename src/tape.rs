use crate::BrainfuckError;

/// Initial number of cells when no setting overrides it.
pub const DEFAULT_TAPE_CELLS: usize = 1024;

/// Upper bound on tape growth when no setting overrides it (256 MiB of cells).
pub const DEFAULT_MAX_TAPE_CELLS: usize = 1 << 28;

/// A growable, zero-initialized byte tape.
///
/// The tape only ever grows. When an access lands one past the end, the
/// length doubles (clamped to `max_cells`) and the new cells read as zero.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    max_cells: usize,
}

impl Tape {
    /// Allocate a tape of `cells` zeroed cells that may grow up to `max_cells`.
    ///
    /// A request for zero cells still allocates one so that index 0 is valid.
    pub fn new(cells: usize, max_cells: usize) -> Result<Self, BrainfuckError> {
        let cells = cells.max(1);
        let max_cells = max_cells.max(cells);

        let mut buf = Vec::new();
        buf.try_reserve_exact(cells)
            .map_err(|_| BrainfuckError::AllocationFailure { cells })?;
        buf.resize(cells, 0);

        Ok(Self { cells: buf, max_cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    pub fn get(&self, index: usize) -> u8 {
        self.cells[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.cells[index]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Make sure `index` is addressable, doubling the tape as needed.
    ///
    /// `ip` is only used to annotate the error.
    pub fn ensure_index(&mut self, index: usize, ip: usize) -> Result<(), BrainfuckError> {
        if index < self.cells.len() {
            return Ok(());
        }
        if index >= self.max_cells {
            return Err(BrainfuckError::OutOfMemory { ip, requested: index + 1 });
        }

        let mut new_len = self.cells.len().max(1);
        while new_len <= index {
            new_len = new_len.saturating_mul(2);
        }
        let new_len = new_len.min(self.max_cells);

        self.cells
            .try_reserve_exact(new_len - self.cells.len())
            .map_err(|_| BrainfuckError::OutOfMemory { ip, requested: new_len })?;
        log::debug!("growing tape from {} to {} cells", self.cells.len(), new_len);
        self.cells.resize(new_len, 0);
        Ok(())
    }
}
