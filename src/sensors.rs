//! Region predicates over the front-wheel ground probes.
//!
//! Leaving the road needs only one wheel on terrain; being inside a lane needs
//! both wheels on it. A wheel without contact matches no surface.

use crate::body::{GroundHit, VehicleBody};
use crate::types::{Surface, Wheel};

/// Snapshot of both front-wheel probes for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrontContacts {
    pub left: Option<GroundHit>,
    pub right: Option<GroundHit>,
}

impl FrontContacts {
    /// Reads the probes of a body.
    pub fn read<B: VehicleBody + ?Sized>(body: &B) -> Self {
        Self {
            left: body.ground_hit(Wheel::FrontLeft),
            right: body.ground_hit(Wheel::FrontRight),
        }
    }

    /// True if either wheel rests on `surface`.
    pub fn is_touching(&self, surface: Surface) -> bool {
        matches_surface(self.left, surface) || matches_surface(self.right, surface)
    }

    /// True if both wheels rest on `surface`.
    pub fn is_only_touching(&self, surface: Surface) -> bool {
        matches_surface(self.left, surface) && matches_surface(self.right, surface)
    }

    /// True if neither wheel reports contact.
    pub fn is_airborne(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

fn matches_surface(hit: Option<GroundHit>, surface: Surface) -> bool {
    hit.is_some_and(|h| h.surface == surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ScriptedBody;
    use crate::types::Lane;

    #[test]
    fn one_wheel_on_terrain_is_touching_terrain() {
        let mut body = ScriptedBody::new();
        body.set_front_contacts(Some(Surface::Terrain), Some(Surface::Lane(Lane::Low)));
        let contacts = FrontContacts::read(&body);
        assert!(contacts.is_touching(Surface::Terrain));
        assert!(!contacts.is_only_touching(Surface::Lane(Lane::Low)));
        assert!(contacts.is_touching(Surface::Lane(Lane::Low)));
    }

    #[test]
    fn both_wheels_in_lane() {
        let body = ScriptedBody::resting_on(Surface::Lane(Lane::High));
        let contacts = FrontContacts::read(&body);
        assert!(contacts.is_only_touching(Surface::Lane(Lane::High)));
        assert!(!contacts.is_touching(Surface::Terrain));
        assert!(!contacts.is_touching(Surface::Lane(Lane::Low)));
    }

    #[test]
    fn airborne_touches_nothing() {
        let body = ScriptedBody::new();
        let contacts = FrontContacts::read(&body);
        assert!(contacts.is_airborne());
        assert!(!contacts.is_touching(Surface::Terrain));
        assert!(!contacts.is_only_touching(Surface::Lane(Lane::Low)));
    }

    #[test]
    fn one_wheel_airborne_is_not_fully_in_lane() {
        let mut body = ScriptedBody::new();
        body.set_front_contacts(Some(Surface::Lane(Lane::Low)), None);
        let contacts = FrontContacts::read(&body);
        assert!(!contacts.is_only_touching(Surface::Lane(Lane::Low)));
        assert!(!contacts.is_airborne());
    }
}
