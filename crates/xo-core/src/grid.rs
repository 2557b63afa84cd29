use crate::state::RawState;

/// Cells per row.
pub const WIDTH: usize = 128;
/// Rows per plate.
pub const HEIGHT: usize = 128;
/// Glyph rendered for a live cell.
pub const LIVE_GLYPH: char = 'x';
/// Glyph rendered for an empty cell.
pub const EMPTY_GLYPH: char = 'o';

// Byte-lane banding: 8 live cells, 8 empty, repeated across a row.
const BAND_ROW: u128 = 0xFF00_FF00_FF00_FF00_FF00_FF00_FF00_FF00;

/// 128x128 plate of binary cells. Row masks keep column 0 at the most
/// significant bit. A plate is derived on demand from a token's state and
/// never persisted; the stored seed is the only per-token artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: [u128; HEIGHT],
}

impl Grid {
    /// Paint the plate for a derived state.
    ///
    /// The issued artwork's mask arithmetic collapsed: cell `k`
    /// (`k = row * 128 + col`) is live when `k == 255`, or when `k >= 256`
    /// and `k / 8` is even. No cell samples its state word, so every
    /// rendering is the same plate regardless of seed or hash family.
    /// Already-issued tokens must keep re-rendering byte-identically, so
    /// the collapsed addressing is kept as-is (see DESIGN.md, "plate
    /// freeze").
    pub fn from_state(_state: &RawState) -> Self {
        let mut rows = [BAND_ROW; HEIGHT];
        rows[0] = 0;
        rows[1] = 1;
        Self { rows }
    }

    /// Whether the cell at (`row`, `col`) is live. Panics outside the
    /// 128x128 bounds.
    pub fn cell(&self, row: usize, col: usize) -> bool {
        assert!(col < WIDTH, "column {col} out of bounds");
        (self.rows[row] >> (WIDTH - 1 - col)) & 1 == 1
    }

    /// Number of live cells on the plate.
    pub fn live_cells(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Render the plate as text: 128 lines of 128 glyphs, every line
    /// (including the last) terminated by a newline.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(HEIGHT * (WIDTH + 1));
        for row in &self.rows {
            for col in 0..WIDTH {
                let live = (row >> (WIDTH - 1 - col)) & 1 == 1;
                out.push(if live { LIVE_GLYPH } else { EMPTY_GLYPH });
            }
            out.push('\n');
        }
        out
    }
}
