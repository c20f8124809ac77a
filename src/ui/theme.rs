use ratatui::style::Color;

/// Fixed group color palette. Free-form color strings fall back to the dim
/// default, same as an unset color.
pub fn group_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" => Color::Gray,
        _ => Color::DarkGray,
    }
}
