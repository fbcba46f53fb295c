//! Read-only lookup of users and venues.

use super::models::{User, UserId, Venue, VenueId};

/// Where users and venues come from. Absence is reported as `None`.
pub trait Directory: Send + Sync {
    fn find_user(&self, id: UserId) -> Option<User>;

    fn find_venue(&self, id: VenueId) -> Option<Venue>;

    fn venues(&self) -> Vec<Venue>;

    /// Venues whose owner id matches `owner`, in catalogue order.
    fn venues_owned_by(&self, owner: UserId) -> Vec<Venue> {
        self.venues()
            .into_iter()
            .filter(|venue| venue.owner_id == owner)
            .collect()
    }
}

/// A fixed catalogue held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: Vec<User>,
    venues: Vec<Venue>,
}

impl StaticDirectory {
    pub fn new(users: Vec<User>, venues: Vec<Venue>) -> Self {
        Self { users, venues }
    }
}

impl Directory for StaticDirectory {
    fn find_user(&self, id: UserId) -> Option<User> {
        self.users.iter().find(|user| user.id == id).cloned()
    }

    fn find_venue(&self, id: VenueId) -> Option<Venue> {
        self.venues.iter().find(|venue| venue.id == id).cloned()
    }

    fn venues(&self) -> Vec<Venue> {
        self.venues.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn lookups_report_absence() {
        let directory = fixtures::directory();
        assert_eq!(directory.find_user(UserId(2)).unwrap().name, "Regular User");
        assert!(directory.find_user(UserId(99)).is_none());
        assert!(directory.find_venue(VenueId(3)).is_none());
    }

    #[test]
    fn owner_sees_both_demo_venues() {
        let directory = fixtures::directory();
        let owned: Vec<_> = directory
            .venues_owned_by(UserId(1))
            .into_iter()
            .map(|venue| venue.id)
            .collect();
        assert_eq!(owned, vec![VenueId(1), VenueId(2)]);
        assert!(directory.venues_owned_by(UserId(2)).is_empty());
    }
}
