//! Bounded color palette with least-used allocation.

use std::str::FromStr;

use ::palette::Srgb;

use crate::error::{LayerError, Result};

/// Default track colors, in allocation order.
pub const TRAIL_COLORS: [Srgb<u8>; 11] = [
    Srgb::new(0xff, 0x00, 0x00),
    Srgb::new(0x00, 0x00, 0xff),
    Srgb::new(0x46, 0xe6, 0x46),
    Srgb::new(0x00, 0xcc, 0xff),
    Srgb::new(0xff, 0x99, 0x00),
    Srgb::new(0xff, 0x00, 0xff),
    Srgb::new(0xff, 0xff, 0x32),
    Srgb::new(0x28, 0x82, 0x28),
    Srgb::new(0x99, 0x33, 0xff),
    Srgb::new(0x50, 0xf0, 0xbe),
    Srgb::new(0x8c, 0x64, 0x5a),
];

/// Position of a color in its palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId(usize);

impl ColorId {
    pub fn index(self) -> usize {
        self.0
    }
}

pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Fixed set of colors with a live usage counter per color.
///
/// Invariant: `usage(c)` equals the number of allocations of `c` not yet released.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalette {
    colors: Vec<Srgb<u8>>,
    usage: Vec<u32>,
}

impl ColorPalette {
    pub fn new(colors: Vec<Srgb<u8>>) -> Result<Self> {
        if colors.is_empty() {
            return Err(LayerError::EmptyPalette);
        }
        let usage = vec![0; colors.len()];
        Ok(Self { colors, usage })
    }

    /// Build from CSS hex strings (`#rrggbb`, `rrggbb` or `#rgb`).
    pub fn from_hex<I, S>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = colors
            .into_iter()
            .map(|hex| {
                let hex = hex.as_ref();
                Srgb::<u8>::from_str(hex).map_err(|_| LayerError::InvalidColor(hex.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ColorId> {
        (0..self.colors.len()).map(ColorId)
    }

    pub fn color(&self, id: ColorId) -> Srgb<u8> {
        self.colors[id.0]
    }

    pub fn hex(&self, id: ColorId) -> String {
        to_hex(self.color(id))
    }

    pub fn usage(&self, id: ColorId) -> u32 {
        self.usage[id.0]
    }

    /// Take the least used color; ties go to the earliest color in the palette.
    pub fn allocate(&mut self) -> ColorId {
        let mut best = 0;
        for (index, &count) in self.usage.iter().enumerate().skip(1) {
            if count < self.usage[best] {
                best = index;
            }
        }
        self.usage[best] += 1;
        ColorId(best)
    }

    pub fn release(&mut self, id: ColorId) {
        let count = &mut self.usage[id.0];
        if *count == 0 {
            tracing::warn!("released unallocated color {}", self.hex(id));
            return;
        }
        *count -= 1;
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: TRAIL_COLORS.to_vec(),
            usage: vec![0; TRAIL_COLORS.len()],
        }
    }
}
