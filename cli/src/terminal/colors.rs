use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::Cyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const VIRTUAL_SERVER: Color = Color::Green;
pub const POOL: Color = Color::Yellow;
pub const WARNING: Color = Color::Yellow;
