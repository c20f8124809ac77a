use crate::store::Config;
use crossterm::style::{Color, Stylize};
use std::io::IsTerminal;

pub fn print_groups(config: &Config) {
    if config.groups.is_empty() {
        println!("No groups configured. Use 'sshto groups add' to create one.");
        return;
    }

    let use_color = std::io::stdout().is_terminal();
    for group in &config.groups {
        let count = config.servers_by_group(&group.name).len();
        println!(
            "{} ({} servers)",
            group_tag(&group.name, &group.color, use_color),
            count
        );
    }
}

fn group_tag(name: &str, color: &str, use_color: bool) -> String {
    if !use_color {
        return format!("[{}]", name);
    }
    format!("{}", format!(" {} ", name).with(Color::Black).on(group_color(color)))
}

fn group_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "red" => Color::DarkRed,
        "green" => Color::DarkGreen,
        "yellow" => Color::DarkYellow,
        "blue" => Color::DarkBlue,
        "magenta" => Color::DarkMagenta,
        "cyan" => Color::DarkCyan,
        "white" => Color::White,
        "gray" => Color::Grey,
        _ => Color::DarkGrey,
    }
}
