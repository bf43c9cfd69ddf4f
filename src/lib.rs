//! Charged projectile launcher library
//!
//! Predicts the parabolic arc from a launcher to a moving aim point, lets the
//! player charge the shot to add loft, and hands the solved launch velocity to
//! Rapier when the button is released.

pub mod config;
pub mod constants;
pub mod error;
pub mod launcher;
