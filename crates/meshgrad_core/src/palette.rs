//! Ordered palette of linear colors

use crate::color::{Color, ColorInput};

/// Colors converted once from caller input, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Convert every input; malformed entries become white so the
    /// palette length always matches the input length.
    pub fn from_inputs(inputs: &[ColorInput]) -> Self {
        Self {
            colors: inputs.iter().map(ColorInput::resolve_lossy).collect(),
        }
    }

    pub fn from_colors(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// RGBA entries for the palette storage buffer
    ///
    /// GPU buffers cannot be empty, so an empty palette uploads a single
    /// white entry. The shader only reads `len()` entries.
    pub fn to_gpu_colors(&self) -> Vec<[f32; 4]> {
        if self.colors.is_empty() {
            return vec![Color::WHITE.to_array(1.0)];
        }
        self.colors.iter().map(|c| c.to_array(1.0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_order_preserved() {
        let inputs: Vec<ColorInput> = vec!["#FF0000".into(), 0x00FF00.into(), "#0000FF".into()];
        let palette = Palette::from_inputs(&inputs);
        assert_eq!(palette.len(), 3);
        let hexes: Vec<u32> = palette.colors().iter().map(Color::to_hex).collect();
        assert_eq!(hexes, vec![0xFF0000, 0x00FF00, 0x0000FF]);
    }

    #[test]
    fn test_invalid_entry_keeps_its_slot() {
        let inputs: Vec<ColorInput> = vec!["#000000".into(), "bogus".into(), "#000000".into()];
        let palette = Palette::from_inputs(&inputs);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.colors()[1], Color::WHITE);
        assert_eq!(palette.colors()[2], Color::BLACK);
    }

    #[test]
    fn test_gpu_colors() {
        let palette = Palette::from_colors(vec![Color::BLACK, Color::WHITE]);
        assert_eq!(
            palette.to_gpu_colors(),
            vec![[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]]
        );
    }

    #[test]
    fn test_empty_palette_uploads_placeholder() {
        let palette = Palette::default();
        assert!(palette.is_empty());
        assert_eq!(palette.to_gpu_colors().len(), 1);
    }
}
