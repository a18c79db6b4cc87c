//! Confirmation state machine shared by trips and participants.

/// Confirmation state of a trip or a participant.
///
/// State transitions:
/// ```text
/// Unconfirmed ──► Confirmed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Confirmation {
    /// Not confirmed yet.
    #[default]
    Unconfirmed,

    /// Confirmed (terminal state).
    Confirmed,
}

impl Confirmation {
    /// Maps a stored confirmation flag to its state.
    pub fn from_flag(is_confirmed: bool) -> Self {
        if is_confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Unconfirmed
        }
    }

    /// Returns true if the confirm transition is allowed from this state.
    pub fn can_confirm(&self) -> bool {
        matches!(self, Confirmation::Unconfirmed)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Confirmation::Confirmed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::Unconfirmed => "Unconfirmed",
            Confirmation::Confirmed => "Confirmed",
        }
    }
}

impl std::fmt::Display for Confirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconfirmed() {
        assert_eq!(Confirmation::default(), Confirmation::Unconfirmed);
    }

    #[test]
    fn test_from_flag() {
        assert_eq!(Confirmation::from_flag(false), Confirmation::Unconfirmed);
        assert_eq!(Confirmation::from_flag(true), Confirmation::Confirmed);
    }

    #[test]
    fn test_only_unconfirmed_can_confirm() {
        assert!(Confirmation::Unconfirmed.can_confirm());
        assert!(!Confirmation::Confirmed.can_confirm());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!Confirmation::Unconfirmed.is_terminal());
        assert!(Confirmation::Confirmed.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(Confirmation::Unconfirmed.to_string(), "Unconfirmed");
        assert_eq!(Confirmation::Confirmed.to_string(), "Confirmed");
    }
}
