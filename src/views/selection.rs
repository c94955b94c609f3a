use crate::jules::Source;

/// Which source a view is showing. A refreshed source list only fills in a
/// default while nothing has been selected yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceSelection {
    #[default]
    Unset,
    Defaulted(String),
    UserChosen(String),
}

impl SourceSelection {
    pub fn value(&self) -> Option<&str> {
        match self {
            SourceSelection::Unset => None,
            SourceSelection::Defaulted(name) | SourceSelection::UserChosen(name) => Some(name),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, SourceSelection::Unset)
    }

    /// Select the first source if still unset. Returns true when the
    /// selection changed.
    pub fn apply_default(&mut self, sources: &[Source]) -> bool {
        if !self.is_unset() {
            return false;
        }
        match sources.first() {
            Some(first) => {
                *self = SourceSelection::Defaulted(first.name.clone());
                true
            }
            None => false,
        }
    }

    /// Record an explicit user pick. An empty name clears the selection.
    /// Returns true when the selected value changed.
    pub fn choose(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let changed = self.value() != Some(name.as_str());
        *self = if name.is_empty() {
            SourceSelection::Unset
        } else {
            SourceSelection::UserChosen(name)
        };
        changed
    }
}
