use thiserror::Error;

/// Errors reported while validating an [`EnvConfig`](crate::config::EnvConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Speed range is empty: min {min} > max {max}")]
    EmptySpeedRange { min: i32, max: i32 },

    #[error("Target speed {target} for lane {lane} lies outside [{min}, {max}]")]
    TargetOutOfRange {
        lane: String,
        target: i32,
        min: i32,
        max: i32,
    },

    #[error("Maximum speed level must be positive, got {0}")]
    NonPositiveMaxSpeed(i32),

    #[error("Trigger threshold lower bound {min} must be at least {minimum}")]
    TriggerBelowMinimum { min: u32, minimum: u32 },

    #[error("Trigger range is empty: [{min}, {max})")]
    EmptyTriggerRange { min: u32, max: u32 },

    #[error("Permitted lane-change duration must be positive")]
    ZeroPermittedDuration,

    #[error("Manual trigger lead {lead} must be below the permitted duration {duration}")]
    LeadNotBelowDuration { lead: u32, duration: u32 },

    #[error("Start pose table is empty")]
    EmptyStartPoses,

    #[error("Turn action range is empty")]
    EmptyTurnRange,

    #[error("Turn and motor action ranges overlap")]
    OverlappingActionRanges,
}

/// Errors raised by agent construction and cohort stepping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Expected {expected} action vectors, got {actual}")]
    ActionCountMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collaborator_display() {
        let e = EnvError::MissingCollaborator("vehicle body");
        assert_eq!(e.to_string(), "Missing required collaborator: vehicle body");
    }

    #[test]
    fn config_error_converts() {
        let e: EnvError = ConfigError::ZeroPermittedDuration.into();
        assert_eq!(
            e.to_string(),
            "Invalid configuration: Permitted lane-change duration must be positive"
        );
    }

    #[test]
    fn action_count_mismatch_display() {
        let e = EnvError::ActionCountMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(e.to_string(), "Expected 3 action vectors, got 2");
    }
}
