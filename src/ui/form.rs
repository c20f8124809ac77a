use crate::model::{Group, Server};
use crate::validate::{validate_host, validate_key_file, validate_name, validate_port};

/// The form's focus ring, in fixed order. One generic text buffer per field;
/// the kind tag is all that distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Host,
    User,
    Port,
    Key,
    Group,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Host,
        Field::User,
        Field::Port,
        Field::Key,
        Field::Group,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|field| *field == self).unwrap_or(0)
    }

    fn next(self) -> Field {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Field {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Host => "Host",
            Field::User => "User",
            Field::Port => "Port",
            Field::Key => "Key",
            Field::Group => "Group",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "server-name",
            Field::Host => "192.168.1.1 or hostname.com",
            Field::User => "optional",
            Field::Port => "22",
            Field::Key => "~/.ssh/id_rsa (optional)",
            Field::Group => "optional",
        }
    }
}

/// Add/edit form state machine: cyclic focus over the six fields plus the two
/// terminal outcomes, done and canceled.
pub struct FormState {
    values: [String; 6],
    focused: Field,
    is_edit: bool,
    groups: Vec<Group>,
    error: Option<String>,
    warning: Option<String>,
    server: Option<Server>,
    canceled: bool,
}

impl FormState {
    /// A fresh form, or one pre-populated from an existing server when
    /// editing. A zero port renders as an empty string, not "0".
    pub fn new(existing: Option<&Server>, groups: &[Group]) -> Self {
        let mut values: [String; 6] = Default::default();
        if let Some(server) = existing {
            values[Field::Name.index()] = server.name.clone();
            values[Field::Host.index()] = server.host.clone();
            values[Field::User.index()] = server.user.clone();
            if server.port != 0 {
                values[Field::Port.index()] = server.port.to_string();
            }
            values[Field::Key.index()] = server.key.clone();
            values[Field::Group.index()] = server.group.clone();
        }

        Self {
            values,
            focused: Field::Name,
            is_edit: existing.is_some(),
            groups: groups.to_vec(),
            error: None,
            warning: None,
            server: None,
            canceled: false,
        }
    }

    pub fn focused(&self) -> Field {
        self.focused
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_edit(&self) -> bool {
        self.is_edit
    }

    pub fn is_done(&self) -> bool {
        self.server.is_some()
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// The completed record, present only once the form reached done.
    pub fn server(&self) -> Option<&Server> {
        self.server.as_ref()
    }

    /// Forward navigation: wraps from the last field to the first. Never
    /// validates.
    pub fn advance(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn retreat(&mut self) {
        self.focused = self.focused.prev();
    }

    /// Confirm on any field but the last advances; on the last field it
    /// submits the whole record.
    pub fn confirm(&mut self) {
        if self.focused == Field::Group {
            self.submit();
        } else {
            self.advance();
        }
    }

    /// Cancels from any field, discarding in-progress edits.
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn insert(&mut self, ch: char) {
        self.values[self.focused.index()].push(ch);
    }

    pub fn backspace(&mut self) {
        self.values[self.focused.index()].pop();
    }

    fn submit(&mut self) {
        self.error = None;

        let name = self.value(Field::Name).trim().to_string();
        if let Err(err) = validate_name(&name) {
            self.error = Some(err.to_string());
            return;
        }

        let host = self.value(Field::Host).trim().to_string();
        if let Err(err) = validate_host(&host) {
            self.error = Some(err.to_string());
            return;
        }

        let port_input = self.value(Field::Port).trim();
        let port = if port_input.is_empty() {
            0
        } else {
            let Ok(port) = port_input.parse::<i64>() else {
                self.error = Some("port must be a valid number (0-65535)".to_string());
                return;
            };
            if let Err(err) = validate_port(port) {
                self.error = Some(err.to_string());
                return;
            }
            port as u16
        };

        let key = self.value(Field::Key).trim().to_string();
        match validate_key_file(&key) {
            Ok(Some(warning)) => self.warning = Some(warning),
            Ok(None) => {}
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        }

        self.server = Some(Server {
            name,
            host,
            user: self.value(Field::User).trim().to_string(),
            port,
            key,
            group: self.value(Field::Group).trim().to_string(),
        });
    }
}
