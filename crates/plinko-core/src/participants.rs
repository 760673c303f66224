//! Participant list.
//!
//! One slot per participant, in list order.

use serde::{Deserialize, Serialize};

use crate::error::ParticipantError;

/// A name on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Text shown on the slot label.
    pub value: String,
    /// Optional text for speech output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken: Option<String>,
}

impl Participant {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            spoken: None,
        }
    }

    #[must_use]
    pub fn with_spoken(mut self, spoken: impl Into<String>) -> Self {
        self.spoken = Some(spoken.into());
        self
    }

    /// What a speech engine should say for this participant.
    pub fn pronunciation(&self) -> &str {
        self.spoken.as_deref().unwrap_or(&self.value)
    }
}

/// Non-empty, ordered list of participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParticipantList(Vec<Participant>);

impl ParticipantList {
    pub fn new(participants: Vec<Participant>) -> Result<Self, ParticipantError> {
        if participants.is_empty() {
            return Err(ParticipantError::Empty);
        }
        Ok(Self(participants))
    }

    /// Parses a JSON array of `{ "value": ..., "spoken": ... }` objects.
    pub fn from_json(json: &str) -> Result<Self, ParticipantError> {
        let participants: Vec<Participant> = serde_json::from_str(json)?;
        Self::new(participants)
    }

    /// Built-in demo list.
    /// Loaded from participants/demo.json at compile time.
    pub fn demo() -> Self {
        const DEMO_JSON: &str = include_str!("../participants/demo.json");
        Self::from_json(DEMO_JSON).expect("Failed to parse demo participants JSON")
    }

    /// Number of slots the board needs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Participant> {
        self.0.get(slot)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ParticipantList {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
