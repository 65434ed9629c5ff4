//! People on the roster: creators, technicians and commenters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::text::name_to_initials;

/// Team a person belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// System administrators
    SA,
    /// Information system security officers
    ISSO,
    /// Planning and control
    PC,
}

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Full name, "First Last"
    pub name: String,
    /// Mail address
    #[serde(default)]
    pub email: String,
    /// Team
    pub group: Group,
    /// Whether this person may be credited on task actuals
    #[serde(default)]
    pub technician: bool,
    /// Employee number, if known
    #[serde(default)]
    pub bems: Option<u32>,
}

impl Person {
    /// Create a roster entry.
    pub fn new(name: impl Into<String>, email: impl Into<String>, group: Group, technician: bool, bems: Option<u32>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            group,
            technician,
            bems,
        }
    }

    /// Upper-case initials of the name.
    pub fn initials(&self) -> String {
        name_to_initials(&self.name)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.initials().chars().next().unwrap_or(' ');
        let last = self.name.split(' ').next_back().unwrap_or("");
        match self.bems {
            Some(bems) => write!(f, "{}. {} / {}", first, last, bems),
            None => write!(f, "{}. {} / -1", first, last),
        }
    }
}

/// Everyone in `people` belonging to `group`.
pub fn people_in_group(people: &[Person], group: Group) -> Vec<&Person> {
    people.iter().filter(|p| p.group == group).collect()
}

/// Everyone in `people` flagged as a technician.
pub fn technicians(people: &[Person]) -> Vec<&Person> {
    people.iter().filter(|p| p.technician).collect()
}
