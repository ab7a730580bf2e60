use helica_glyph::CORR_COLORS;

/// Number of correlation color slots.
pub const PALETTE_SIZE: usize = CORR_COLORS.len();

/// Allocator for the correlation color slots of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    taken: [bool; PALETTE_SIZE],
}

impl Palette {
    /// A palette with every slot free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the first free slot.
    pub fn allocate(&mut self) -> Option<usize> {
        let slot = self.taken.iter().position(|taken| !taken)?;
        self.taken[slot] = true;
        Some(slot)
    }

    /// Free `slot`. Freeing a free or unknown slot does nothing.
    pub fn release(&mut self, slot: usize) {
        if let Some(taken) = self.taken.get_mut(slot) {
            *taken = false;
        }
    }

    /// Whether `slot` is in use.
    pub fn is_taken(&self, slot: usize) -> bool {
        self.taken.get(slot).copied().unwrap_or(false)
    }

    /// Number of free slots.
    pub fn available(&self) -> usize {
        self.taken.iter().filter(|taken| !**taken).count()
    }

    /// Free every slot.
    pub fn clear(&mut self) {
        self.taken = [false; PALETTE_SIZE];
    }
}
