use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// Opaque, derived from the creation timestamp.
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    /// Stored as entered; may exceed the target.
    pub saved_amount: f64,
}

impl SavingsGoal {
    /// Display progress in `[0, 100]`. The stored amounts are never clamped.
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.saved_amount, self.target_amount)
    }

    pub fn status(&self) -> GoalStatus {
        GoalStatus::from_percent(self.progress_percent())
    }
}

pub fn progress_percent(saved: f64, target: f64) -> f64 {
    if target <= 0.0 || saved.is_nan() {
        return 0.0;
    }
    (saved * 100.0 / target).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    Reached,
    AlmostThere,
    Halfway,
    KeepSaving,
}

impl GoalStatus {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            Self::Reached
        } else if percent >= 75.0 {
            Self::AlmostThere
        } else if percent >= 50.0 {
            Self::Halfway
        } else {
            Self::KeepSaving
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Reached => "Goal reached!",
            Self::AlmostThere => "Almost there!",
            Self::Halfway => "Halfway there",
            Self::KeepSaving => "Keep saving",
        }
    }
}

/// Input for a new goal, as typed into the add-goal form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub saved_amount: Option<f64>,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            name: name.into(),
            target_amount,
            saved_amount: None,
        }
    }

    pub fn with_saved(mut self, saved_amount: f64) -> Self {
        self.saved_amount = Some(saved_amount);
        self
    }

    fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.target_amount > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalTotals {
    pub target: f64,
    pub saved: f64,
}

impl GoalTotals {
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.saved, self.target)
    }
}

/// In-memory list of savings goals. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct GoalTracker {
    goals: Vec<SavingsGoal>,
    last_id: i64,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three goals the tracker opens with.
    pub fn with_sample_goals() -> Self {
        let seed = |id: &str, name: &str, target: f64, saved: f64| SavingsGoal {
            id: id.to_string(),
            name: name.to_string(),
            target_amount: target,
            saved_amount: saved,
        };
        Self {
            goals: vec![
                seed("1", "Vacation", 50000.0, 15000.0),
                seed("2", "Emergency Fund", 100000.0, 45000.0),
                seed("3", "New Laptop", 80000.0, 32000.0),
            ],
            last_id: 3,
        }
    }

    pub fn goals(&self) -> &[SavingsGoal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Adds a goal and returns it. Invalid input (blank name, non-positive
    /// target) is ignored and returns `None`.
    pub fn add(&mut self, goal: NewGoal) -> Option<&SavingsGoal> {
        if !goal.is_valid() {
            debug!("Ignoring invalid goal {:?}", goal);
            return None;
        }

        let id = self.next_id(Utc::now().timestamp_millis());
        self.goals.push(SavingsGoal {
            id,
            name: goal.name,
            target_amount: goal.target_amount,
            saved_amount: goal.saved_amount.unwrap_or(0.0),
        });
        self.goals.last()
    }

    /// Removes the goal with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        self.goals.len() != before
    }

    pub fn totals(&self) -> GoalTotals {
        GoalTotals {
            target: self.goals.iter().map(|g| g.target_amount).sum(),
            saved: self.goals.iter().map(|g| g.saved_amount).sum(),
        }
    }

    fn next_id(&mut self, now_millis: i64) -> String {
        let mut candidate = now_millis.max(self.last_id + 1);
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        self.last_id = candidate;
        candidate.to_string()
    }
}
