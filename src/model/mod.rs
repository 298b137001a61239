//! Core data structures describing practice molecules.
//!
//! - [`types`] – Supported elements, their valence counts, and bond orders.
//! - [`molecule`] – Answer keys: atoms by index, expected bonds and lone
//!   pairs, and the central-atom designation.
//! - [`geometry`] – Optional layout tags carried for renderers.
//!
//! Atoms are identified everywhere by their index into
//! [`Molecule::atoms`](molecule::Molecule::atoms). Bonds between two atoms
//! are keyed by [`AtomPair`](molecule::AtomPair), which is unordered.

pub mod geometry;
pub mod molecule;
pub mod types;
