use crate::model::Server;
use crate::ui::filter::filter_servers;

/// State for the interactive server selector: a filterable collection with a
/// single highlighted entry.
pub struct SelectState {
    servers: Vec<Server>,
    pub filter: String,
    filtered_indices: Vec<usize>,
    selected: usize,
}

impl SelectState {
    pub fn new(servers: &[Server]) -> Self {
        let mut state = Self {
            servers: servers.to_vec(),
            filter: String::new(),
            filtered_indices: Vec::new(),
            selected: 0,
        };
        state.refresh_filter();
        state
    }

    pub fn refresh_filter(&mut self) {
        self.filtered_indices = filter_servers(&self.servers, &self.filter);
        if self.selected >= self.filtered_indices.len() {
            self.selected = 0;
        }
    }

    pub fn move_next(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.filtered_indices.len();
    }

    pub fn move_prev(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.filtered_indices.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn on_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.refresh_filter();
    }

    pub fn backspace(&mut self) {
        self.filter.pop();
        self.refresh_filter();
    }

    pub fn selected_server(&self) -> Option<&Server> {
        self.filtered_indices
            .get(self.selected)
            .map(|index| &self.servers[*index])
    }

    pub fn filtered_servers(&self) -> Vec<&Server> {
        self.filtered_indices
            .iter()
            .map(|index| &self.servers[*index])
            .collect()
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.filtered_indices.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }
}

/// Narrows the candidate set by exact, case-insensitive group name before the
/// interactive loop starts. An empty group means no narrowing.
pub fn filter_by_group(servers: &[Server], group: &str) -> Vec<Server> {
    if group.is_empty() {
        return servers.to_vec();
    }
    servers
        .iter()
        .filter(|server| server.group.eq_ignore_ascii_case(group))
        .cloned()
        .collect()
}
