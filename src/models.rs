use std::collections::HashMap;

use once_cell::sync::Lazy;

pub static HOMEWORK_VERDICTS: Lazy<HashMap<ReviewStatus, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (ReviewStatus::Approved, "Работа проверена: ревьюеру всё понравилось. Ура!"),
        (ReviewStatus::Reviewing, "Работа взята на проверку ревьюером."),
        (ReviewStatus::Rejected, "Работа проверена: у ревьюера есть замечания."),
    ])
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn verdict(self) -> &'static str {
        HOMEWORK_VERDICTS[&self]
    }
}

/// One homework entry as reported by the review API, after its fields
/// have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub name: String,
    pub status: ReviewStatus,
}
