//! Per-invocation visit tracking
//!
//! Every task name moves `unvisited -> in progress -> done` at most once per
//! invocation. Entering a name that is still in progress means the dependency
//! graph loops back on itself.

use std::collections::HashMap;

use crate::types::{ApexError, ApexResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

#[derive(Debug, Default)]
pub struct Visits {
    states: HashMap<String, VisitState>,
    /// Names currently in progress, outermost first
    path: Vec<String>,
}

impl Visits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` in progress. Returns `false` if it already finished.
    pub fn enter(&mut self, name: &str) -> ApexResult<bool> {
        match self.states.get(name) {
            Some(VisitState::Done) => Ok(false),
            Some(VisitState::InProgress) => Err(ApexError::CycleDetected(self.cycle_from(name))),
            None => {
                self.states.insert(name.to_string(), VisitState::InProgress);
                self.path.push(name.to_string());
                Ok(true)
            }
        }
    }

    /// Mark `name` done
    pub fn leave(&mut self, name: &str) {
        self.states.insert(name.to_string(), VisitState::Done);
        if let Some(pos) = self.path.iter().rposition(|n| n == name) {
            self.path.remove(pos);
        }
    }

    fn cycle_from(&self, name: &str) -> String {
        let start = self.path.iter().position(|n| n == name).unwrap_or(0);
        let mut cycle: Vec<&str> = self.path[start..].iter().map(String::as_str).collect();
        cycle.push(name);
        cycle.join(" -> ")
    }
}
