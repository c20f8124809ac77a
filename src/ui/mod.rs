mod filter;
mod form;
mod select;
mod theme;

use crate::model::{Group, Server};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::io;
use std::time::Duration;

pub use form::{Field, FormState};
pub use select::filter_by_group;
use select::SelectState;

const FIELD_LABEL_WIDTH: usize = 6;

/// Runs the interactive selector over `servers`. Returns the chosen server,
/// or `None` when the user quit without selecting.
pub fn run_select(servers: &[Server], groups: &[Group]) -> Result<Option<Server>> {
    let mut state = SelectState::new(servers);
    with_terminal(|terminal| select_loop(terminal, &mut state, groups))
}

/// Runs the add/edit form. Returns the completed server record, or `None`
/// when the user canceled.
pub fn run_form(existing: Option<&Server>, groups: &[Group]) -> Result<Option<Server>> {
    let mut form = FormState::new(existing, groups);
    with_terminal(|terminal| form_loop(terminal, &mut form))
}

fn with_terminal<T>(
    run: impl FnOnce(&mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<T>,
) -> Result<T> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(PartialEq)]
enum SelectMode {
    Normal,
    Search,
}

fn select_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut SelectState,
    groups: &[Group],
) -> Result<Option<Server>> {
    let mut mode = SelectMode::Normal;

    loop {
        terminal.draw(|frame| draw_select(frame, state, groups, &mode))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if is_ctrl_c(&key) {
            return Ok(None);
        }

        match mode {
            SelectMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
                KeyCode::Enter => return Ok(state.selected_server().cloned()),
                KeyCode::Up | KeyCode::Char('k') => state.move_prev(),
                KeyCode::Down | KeyCode::Char('j') => state.move_next(),
                KeyCode::Char('/') => {
                    state.filter.clear();
                    state.refresh_filter();
                    mode = SelectMode::Search;
                }
                _ => {}
            },
            SelectMode::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => mode = SelectMode::Normal,
                KeyCode::Backspace => state.backspace(),
                KeyCode::Up => state.move_prev(),
                KeyCode::Down => state.move_next(),
                KeyCode::Char(ch) if !has_modifiers(&key) => state.on_char(ch),
                _ => {}
            },
        }
    }
}

fn draw_select(
    frame: &mut ratatui::Frame,
    state: &SelectState,
    groups: &[Group],
    mode: &SelectMode,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let search = Paragraph::new(format!("/{}", state.filter)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Search"),
    );
    frame.render_widget(search, chunks[0]);
    if *mode == SelectMode::Search {
        let cursor_x = chunks[0].x + 2 + state.filter.len() as u16;
        frame.set_cursor_position((cursor_x, chunks[0].y + 1));
    }

    let items: Vec<ListItem> = state
        .filtered_servers()
        .into_iter()
        .map(|server| ListItem::new(Text::from(vec![title_line(server, groups), desc_line(server)])))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Select a server"),
        )
        .highlight_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(state.selected_index());
    frame.render_stateful_widget(list, chunks[1], &mut list_state);

    let help = match mode {
        SelectMode::Normal => "j/k move | / search | Enter connect | q quit",
        SelectMode::Search => "Type to filter | Enter/Esc exit search",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn title_line(server: &Server, groups: &[Group]) -> Line<'static> {
    let mut spans = Vec::new();
    if !server.group.is_empty() {
        let color = groups
            .iter()
            .find(|group| group.name == server.group)
            .map(|group| theme::group_color(&group.color))
            .unwrap_or(Color::DarkGray);
        spans.push(Span::styled(
            format!(" {} ", server.group),
            Style::default().bg(color).fg(Color::Black),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(server.name.clone()));
    Line::from(spans)
}

fn desc_line(server: &Server) -> Line<'static> {
    Line::styled(
        format!("  {}", server.description()),
        Style::default().fg(Color::DarkGray),
    )
}

fn form_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    form: &mut FormState,
) -> Result<Option<Server>> {
    loop {
        terminal.draw(|frame| draw_form(frame, form))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if is_ctrl_c(&key) {
            form.cancel();
        } else {
            match key.code {
                KeyCode::Esc => form.cancel(),
                KeyCode::Tab | KeyCode::Down => form.advance(),
                KeyCode::BackTab | KeyCode::Up => form.retreat(),
                KeyCode::Enter => form.confirm(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(ch) if !has_modifiers(&key) => form.insert(ch),
                _ => {}
            }
        }

        if form.is_canceled() {
            return Ok(None);
        }
        if form.is_done() {
            return Ok(form.server().cloned());
        }
    }
}

fn draw_form(frame: &mut ratatui::Frame, form: &FormState) {
    let title = if form.is_edit() {
        "Edit Server"
    } else {
        "Add Server"
    };

    let mut lines = Vec::new();
    for field in Field::ALL {
        lines.push(field_line(form, field));
    }

    if let Some(error) = form.error() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(warning) = form.warning() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Warning: {}", warning),
            Style::default().fg(Color::Yellow),
        ));
    }

    if form.focused() == Field::Group && !form.groups().is_empty() {
        let names: Vec<&str> = form.groups().iter().map(|g| g.name.as_str()).collect();
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Available groups: {}", names.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Tab/Shift-Tab navigate | Enter next/submit | Esc cancel",
        Style::default().fg(Color::DarkGray),
    ));

    let area = frame.area();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);

    let field_index = form.focused().index() as u16;
    let value_len = form.value(form.focused()).len() as u16;
    let cursor_x = area.x + 1 + (FIELD_LABEL_WIDTH + 4) as u16 + value_len;
    let cursor_y = area.y + 1 + field_index;
    frame.set_cursor_position((cursor_x, cursor_y));
}

fn field_line(form: &FormState, field: Field) -> Line<'static> {
    let active = form.focused() == field;
    let marker = if active { ">" } else { " " };
    let value = form.value(field);
    let label = format!(
        "{} {:<width$}: ",
        marker,
        field.label(),
        width = FIELD_LABEL_WIDTH
    );

    if value.is_empty() && !active {
        Line::from(vec![
            Span::raw(label),
            Span::styled(
                field.placeholder().to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        let style = if active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![Span::raw(label), Span::styled(value.to_string(), style)])
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn has_modifiers(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
}
