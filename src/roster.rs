use std::fmt;

/// A trimmed, non-empty participant name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant(String);

impl Participant {
    /// Returns None when the name is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of participants; names are unique (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trimmed name. Returns false for empty or duplicate names.
    pub fn add(&mut self, raw: &str) -> bool {
        match Participant::parse(raw) {
            Some(p) if !self.participants.contains(&p) => {
                self.participants.push(p);
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.participants.iter().position(|p| p.name() == name) {
            Some(idx) => {
                self.participants.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn names(&self) -> Vec<&str> {
        self.participants.iter().map(Participant::name).collect()
    }
}
