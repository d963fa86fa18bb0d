//! Contact resolution
//!
//! Maps a contact-begin notification between two tagged bodies to the game
//! effect it should have. The pair is ordered lower-category-first so each
//! rule only has to match one orientation.

use glam::Vec2;

use super::body::NodeId;
use super::category::Category;

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBody {
    pub node: NodeId,
    pub category: Category,
}

/// A pair of bodies that just began touching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: ContactBody,
    pub body_b: ContactBody,
    /// Contact point on `body_b`
    pub point: Vec2,
    /// Surface normal pointing from `body_b` toward `body_a`
    pub normal: Vec2,
}

impl Contact {
    /// The two bodies, lower category first
    ///
    /// On equal categories `body_b` comes first.
    pub fn ordered(&self) -> (ContactBody, ContactBody) {
        if self.body_a.category < self.body_b.category {
            (self.body_a, self.body_b)
        } else {
            (self.body_b, self.body_a)
        }
    }
}

/// What a contact does to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEffect {
    /// The ball touched the floor sensor
    BallReachedBottom,
    /// The ball struck a block, which must be removed
    BreakBlock(NodeId),
}

/// Decide the effect of a contact, if any
pub fn resolve(contact: &Contact) -> Option<ContactEffect> {
    let (first, second) = contact.ordered();

    match (first.category, second.category) {
        (Category::BALL, Category::FLOOR) => Some(ContactEffect::BallReachedBottom),
        (Category::BALL, Category::BLOCK) => Some(ContactEffect::BreakBlock(second.node)),
        _ => None,
    }
}
