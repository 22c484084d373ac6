use crossterm::style::Color;

/// Fill colors for regions, indexed by `region % len`
pub const REGION_COLORS: [Color; 15] = [
    Color::Rgb { r: 255, g: 99, b: 71 },
    Color::Rgb { r: 0, g: 191, b: 255 },
    Color::Rgb { r: 50, g: 205, b: 50 },
    Color::Rgb { r: 255, g: 215, b: 0 },
    Color::Rgb { r: 255, g: 105, b: 180 },
    Color::Rgb { r: 138, g: 43, b: 226 },
    Color::Rgb { r: 255, g: 140, b: 0 },
    Color::Rgb { r: 0, g: 255, b: 127 },
    Color::Rgb { r: 70, g: 130, b: 180 },
    Color::Rgb { r: 220, g: 20, b: 60 },
    Color::Rgb { r: 0, g: 255, b: 255 },
    Color::Rgb { r: 255, g: 0, b: 255 },
    Color::Rgb { r: 0, g: 128, b: 128 },
    Color::Rgb { r: 255, g: 0, b: 0 },
    Color::Rgb { r: 0, g: 0, b: 255 },
];

/// Fill color for a region id
pub fn region_color(region: u16) -> Color {
    REGION_COLORS[usize::from(region) % REGION_COLORS.len()]
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid line color inside a region
    pub border: Color,
    /// Grid line color between regions and on the outer edge
    pub region_border: Color,
    /// Crown glyph color
    pub crown: Color,
    /// Excluded (scratch) mark color
    pub excluded: Color,
    /// Error/conflict color
    pub error: Color,
    /// Success/complete color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            region_border: Color::Rgb { r: 235, g: 235, b: 245 },
            crown: Color::Rgb { r: 10, g: 10, b: 10 },
            excluded: Color::Rgb { r: 40, g: 40, b: 50 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "light",
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            region_border: Color::Rgb { r: 40, g: 40, b: 55 },
            crown: Color::Rgb { r: 10, g: 10, b: 10 },
            excluded: Color::Rgb { r: 60, g: 60, b: 70 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            name: "high contrast",
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            region_border: Color::White,
            crown: Color::Black,
            excluded: Color::Black,
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }

    /// The next theme in the cycle
    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }
}
