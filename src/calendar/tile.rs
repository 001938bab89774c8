use std::num::NonZeroU16;

/// The side length, in columns, shared by every day tile in a rebuild
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum TileSize {
    /// No layout width has been measured yet
    #[default]
    Unmeasured,
    /// A width was measured, but padding leaves no room for the tiles
    TooNarrow,
    Fits(NonZeroU16),
}

impl TileSize {
    pub(crate) fn get(self) -> Option<u16> {
        match self {
            TileSize::Fits(n) => Some(n.get()),
            TileSize::Unmeasured | TileSize::TooNarrow => None,
        }
    }

    pub(crate) fn is_available(self) -> bool {
        matches!(self, TileSize::Fits(_))
    }

    /// Number of terminal rows spanned by a square tile.  Terminal cells are
    /// about twice as tall as they are wide.
    pub(crate) fn rows(self) -> Option<u16> {
        self.get().map(|n| (n / 2).max(1))
    }
}

/// Computes the width of one tile when `days_in_row` tiles, each flanked by
/// padding, share `available_width` columns.  Tiles never grow past
/// `max_tile_size`.
pub(crate) fn tile_size(
    available_width: i32,
    padding_per_side: i32,
    padding_slots: i32,
    days_in_row: u8,
    max_tile_size: NonZeroU16,
) -> TileSize {
    if available_width <= 0 {
        return TileSize::Unmeasured;
    }
    let padded = padding_per_side.saturating_mul(padding_slots);
    let Some(per_tile) = available_width
        .saturating_sub(padded)
        .checked_div(i32::from(days_in_row))
    else {
        return TileSize::TooNarrow;
    };
    let size = per_tile.min(i32::from(max_tile_size.get()));
    tracing::debug!(
        available_width,
        days_in_row,
        per_tile,
        max_tile_size = max_tile_size.get(),
        "computed tile size"
    );
    u16::try_from(size)
        .ok()
        .and_then(NonZeroU16::new)
        .map_or(TileSize::TooNarrow, TileSize::Fits)
}
