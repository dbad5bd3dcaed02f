use ratatui::style::Color;

#[derive(Clone, Debug)]
pub struct Base16Palette {
    pub base_00: Color, // Background
    pub base_01: Color, // Lighter background
    pub base_02: Color, // Selection background
    pub base_03: Color, // Comments, invisibles
    pub base_05: Color, // Default foreground
    pub base_07: Color, // Light background
    pub base_08: Color, // Red
    pub base_0a: Color, // Yellow
    pub base_0c: Color, // Cyan
    pub base_0d: Color, // Blue
}

pub const fn hex(value: u32) -> Color {
    Color::Rgb(
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
    )
}

pub const fn rgb(px: [u8; 3]) -> Color {
    Color::Rgb(px[0], px[1], px[2])
}

// Oceanic Next theme
pub const OCEANIC_NEXT: Base16Palette = Base16Palette {
    base_00: hex(0x1B2B34),
    base_01: hex(0x343D46),
    base_02: hex(0x4F5B66),
    base_03: hex(0x65737E),
    base_05: hex(0xC0C5CE),
    base_07: hex(0xF0F4F8),
    base_08: hex(0xEC5F67),
    base_0a: hex(0xFAC863),
    base_0c: hex(0x5FB3B3),
    base_0d: hex(0x6699CC),
};
