use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
