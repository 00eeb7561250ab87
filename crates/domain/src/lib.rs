//! # casita-domain
//!
//! Pure domain model for the casita home-automation registry.
//!
//! ## Responsibilities
//! - Define **Rooms** (named, kinded groupings with placement rules)
//! - Define **Devices** (lights, thermostats, fans, ovens) and their
//!   type-dependent state
//! - Define the **Registry** aggregate that owns all rooms and devices and
//!   enforces every capacity, placement, and range invariant
//! - Define the closed error taxonomy callers branch on
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Persistence is expressed as a port trait in the `app` crate; this crate
//! only defines the serde shape of the snapshot.

pub mod device;
pub mod error;
pub mod registry;
pub mod room;
