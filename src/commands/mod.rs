//! Command implementations.
//!
//! - [`did_access`] - Users that *did* log in, from rotated `wtmp` files
//! - [`could_access`] - Users that *could* log in, from the snapshot log
//! - [`log_access`] - Append the current key holders to the snapshot log
//!
//! The two query commands share [`query`]: select the log family, read and
//! decode it, aggregate, merge, render.

pub mod could_access;
pub mod did_access;
pub mod log_access;
pub mod query;
