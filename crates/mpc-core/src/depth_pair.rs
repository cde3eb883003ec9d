//! The fixed catalogue of calibrated (deep, shallow) depth pairs.
//!
//! Some deep depths are calibrated against two different shallow
//! depths (e.g. deep 9 against shallow 3 and shallow 5); the [`Slot`]
//! tag disambiguates them. The catalogue order below is the order the
//! encoded table uses, so the search engine can index cells purely by
//! position.

use crate::types::Depth;

/// Smallest shallow depth any pair may use.
pub const MPC_SHALLOW_MIN: Depth = 1;
/// Largest shallow depth any pair may use.
pub const MPC_SHALLOW_MAX: Depth = 6;
/// Smallest deep depth any pair may use.
pub const MPC_DEEP_MIN: Depth = 3;
/// Largest deep depth any pair may use.
pub const MPC_DEEP_MAX: Depth = 14;
/// Maximum number of shallow depths calibrated per deep depth.
pub const MPC_NB_TRY: usize = 2;

/// Disambiguates two shallow depths sharing one deep depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Slot {
    /// First (or only) shallow depth for a deep depth.
    Slot0 = 0,
    /// Second shallow depth, where one exists.
    Slot1 = 1,
}

impl Slot {
    /// Converts to u8.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One calibrated depth pair: predict the deep-search score from the
/// shallow-search score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthPair {
    /// Deep (expensive) search depth.
    pub deep: Depth,
    /// Shallow (cheap) search depth.
    pub shallow: Depth,
    /// Slot within the deep depth.
    pub slot: Slot,
}

impl DepthPair {
    pub const fn new(deep: Depth, shallow: Depth, slot: Slot) -> Self {
        DepthPair {
            deep,
            shallow,
            slot,
        }
    }
}

/// The full depth-pair catalogue, in table encoding order.
#[rustfmt::skip]
pub const DEPTH_PAIRS: [DepthPair; 15] = [
    DepthPair::new( 3, 1, Slot::Slot0),
    DepthPair::new( 4, 2, Slot::Slot0),
    DepthPair::new( 5, 1, Slot::Slot0),
    DepthPair::new( 6, 2, Slot::Slot0),
    DepthPair::new( 7, 3, Slot::Slot0),
    DepthPair::new( 8, 4, Slot::Slot0),
    DepthPair::new( 9, 3, Slot::Slot0),
    DepthPair::new( 9, 5, Slot::Slot1),
    DepthPair::new(10, 4, Slot::Slot0),
    DepthPair::new(10, 6, Slot::Slot1),
    DepthPair::new(11, 3, Slot::Slot0),
    DepthPair::new(11, 5, Slot::Slot1),
    DepthPair::new(12, 4, Slot::Slot0),
    DepthPair::new(13, 5, Slot::Slot0),
    DepthPair::new(14, 6, Slot::Slot0),
];
