//! # sabal-chain
//!
//! Chain data structures for the sabal node: the block and waypoint
//! types exchanged with collaborators, the canonical-chain builder that
//! tracks every known branch above the last finalized header, and the
//! pure verifiers that tie downloaded data to attested waypoints.
//!
//! ## Key Components
//!
//! ### CanonicalChainBuilder
//! The [`CanonicalChainBuilder`] is an in-memory tree of headers rooted
//! at the last finalized header. It owns tip selection: among all
//! leaves, the one with the greatest cumulative difficulty wins, ties
//! broken by the lexicographically smallest hash, so the tip is a pure
//! function of the node set.
//!
//! ### Verifiers
//! [`verify_waypoint_headers`] checks a contiguous header range against
//! a waypoint's attested root, and [`verify_blocks`] performs the
//! structural sanity checks on downloaded block batches. Both are pure;
//! consensus validation belongs to the execution engine.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// Block and block body types carried between the network and the
/// execution engine.
mod block;
pub use block::{Block, BlockBody};

/// The canonical-chain builder and its error type.
mod builder;
pub use builder::{CanonicalChainBuilder, ChainBuilderError};

/// Pure verification predicates for waypoint header ranges and block
/// batches.
mod verifier;
pub use verifier::{VerificationError, verify_blocks, verify_waypoint_headers};

/// Externally attested waypoints (checkpoints and milestones).
mod waypoint;
pub use waypoint::Waypoint;
