use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Implements the string conversions shared by every wire enum:
/// `as_str`, `label`, `Display` and `TryFrom<&str>` / `TryFrom<String>`.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Display label shown to club members.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = FormError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(FormError::UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        // For String
        impl TryFrom<String> for $name {
            type Error = FormError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                $name::try_from(s.as_str())
            }
        }
    };
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    Requested,
    Accepted,
    Rejected,
    Cancelled,
}

wire_enum!(ChallengeStatus, "challenge status", {
    Requested => ("REQUESTED", "Teklif"),
    Accepted => ("ACCEPTED", "Kabul"),
    Rejected => ("REJECTED", "Red"),
    Cancelled => ("CANCELLED", "İptal"),
});

impl ChallengeStatus {
    /// `REQUESTED` is the only state with outgoing transitions.
    pub fn can_transition_to(self, target: ChallengeStatus) -> bool {
        matches!(
            (self, target),
            (
                ChallengeStatus::Requested,
                ChallengeStatus::Accepted | ChallengeStatus::Rejected | ChallengeStatus::Cancelled
            )
        )
    }

    pub fn is_terminal(self) -> bool {
        self != ChallengeStatus::Requested
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneralStatus {
    Active,
    Passive,
    Deleted,
}

wire_enum!(GeneralStatus, "status", {
    Active => ("ACTIVE", "Aktif"),
    Passive => ("PASSIVE", "Pasif"),
    Deleted => ("DELETED", "Silinmiş"),
});

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Man,
    Women,
}

wire_enum!(Gender, "gender", {
    Man => ("MAN", "Erkek"),
    Women => ("WOMEN", "Kadın"),
});

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Proficient,
}

wire_enum!(Level, "level", {
    Beginner => ("BEGINNER", "Başlangıç"),
    Intermediate => ("INTERMEDIATE", "Orta"),
    Advanced => ("ADVANCED", "İyi"),
    Proficient => ("PROFICIENT", "Profesyonel"),
});

/// Filter, sort and paging parameters for list requests.
///
/// Rendered to query pairs in a fixed order: `page`, `size`, one `sort`
/// per entry, then filters exactly as given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Vec<String>,
    pub filters: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    /// Adds a sort clause such as `"id,asc"`.
    pub fn sort(mut self, clause: impl Into<String>) -> Self {
        self.sort.push(clause.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2 + self.sort.len() + self.filters.len());
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        for clause in &self.sort {
            pairs.push(("sort".to_string(), clause.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChallengeCriteria {
    pub challenge_status: Option<ChallengeStatus>,
    pub status: Option<GeneralStatus>,
    pub cord_id: Option<i64>,
    pub proposer_id: Option<i64>,
    pub acceptor_id: Option<i64>,
}

impl From<ChallengeCriteria> for RequestOptions {
    fn from(c: ChallengeCriteria) -> Self {
        let mut opts = RequestOptions::new();
        if let Some(s) = c.challenge_status {
            opts = opts.filter("challengeStatus.equals", s);
        }
        if let Some(s) = c.status {
            opts = opts.filter("status.equals", s);
        }
        if let Some(id) = c.cord_id {
            opts = opts.filter("cordId.equals", id);
        }
        if let Some(id) = c.proposer_id {
            opts = opts.filter("proposerId.equals", id);
        }
        if let Some(id) = c.acceptor_id {
            opts = opts.filter("acceptorId.equals", id);
        }
        opts
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CordCriteria {
    pub name: Option<String>,
    pub status: Option<GeneralStatus>,
    /// `Some(false)` selects cords not yet bound to a challenge.
    pub challenge_assigned: Option<bool>,
}

impl From<CordCriteria> for RequestOptions {
    fn from(c: CordCriteria) -> Self {
        let mut opts = RequestOptions::new();
        if let Some(name) = c.name {
            opts = opts.filter("name.contains", name);
        }
        if let Some(s) = c.status {
            opts = opts.filter("status.equals", s);
        }
        if let Some(assigned) = c.challenge_assigned {
            opts = opts.filter("challengeId.specified", assigned);
        }
        opts
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerCriteria {
    pub full_name: Option<String>,
    pub gender: Option<Gender>,
    pub level: Option<Level>,
    pub status: Option<GeneralStatus>,
    pub internal_user_id: Option<i64>,
}

impl From<PlayerCriteria> for RequestOptions {
    fn from(c: PlayerCriteria) -> Self {
        let mut opts = RequestOptions::new();
        if let Some(name) = c.full_name {
            opts = opts.filter("fullName.contains", name);
        }
        if let Some(g) = c.gender {
            opts = opts.filter("gender.equals", g);
        }
        if let Some(l) = c.level {
            opts = opts.filter("level.equals", l);
        }
        if let Some(s) = c.status {
            opts = opts.filter("status.equals", s);
        }
        if let Some(id) = c.internal_user_id {
            opts = opts.filter("internalUserId.equals", id);
        }
        opts
    }
}
