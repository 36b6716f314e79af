use std::fmt;

/// The symbolic state of a tracked entity, e.g. `home` or the name of a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneState(String);

impl ZoneState {
    /// The entity is not inside any known zone.
    pub const NOT_HOME: &'static str = "not_home";

    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_not_present(&self) -> bool {
        self.0 == Self::NOT_HOME
    }

    /// The state with its first character in upper case.
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for ZoneState {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for ZoneState {
    fn from(from: &str) -> Self {
        Self(from.to_owned())
    }
}

impl fmt::Display for ZoneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
