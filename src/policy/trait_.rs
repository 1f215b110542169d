//! Policy trait for the driving environment.

/// A policy that produces action vectors from observations.
///
/// Action vectors follow the environment's
/// [`ActionLayout`](crate::action::ActionLayout); the environment reduces each
/// sub-range by arg-max.
pub trait Policy: Send + Sync {
    /// Produces one action vector per agent.
    ///
    /// # Arguments
    ///
    /// * `observations` - Per-agent observation vectors (see [`ObservationBuilder`](crate::observation::ObservationBuilder))
    fn select_actions(&mut self, observations: &[Vec<f32>]) -> Vec<Vec<f32>>;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
