use std::fmt;
use std::str::FromStr;

use crate::error::NegotiateError;
use crate::kind::ContentKind;

/// Kind of record exchanged by the inventory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Medicine,
    Reminder,
    UsageEvent,
}

impl Entity {
    pub const ALL: [Entity; 3] = [Self::Medicine, Self::Reminder, Self::UsageEvent];

    pub fn name(self) -> &'static str {
        match self {
            Self::Medicine => "medicine",
            Self::Reminder => "reminder",
            Self::UsageEvent => "usage",
        }
    }

    /// Kinds this entity can be produced in. Positional frames exist only
    /// for medicines.
    pub fn available(self) -> &'static [ContentKind] {
        match self {
            Self::Medicine => &ContentKind::ALL,
            Self::Reminder | Self::UsageEvent => {
                &[ContentKind::Plain, ContentKind::GeneralBinary]
            }
        }
    }

    pub fn supports(self, kind: ContentKind) -> bool {
        self.available().contains(&kind)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = NegotiateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medicine" | "medicines" => Ok(Self::Medicine),
            "reminder" | "reminders" => Ok(Self::Reminder),
            "usage" | "usage-event" | "usage_event" => Ok(Self::UsageEvent),
            _ => Err(NegotiateError::UnknownEntity(s.to_string())),
        }
    }
}
