//! Angular constants shared by the projection and pixelization code.

use core::f64::consts;

pub const PI: f64 = consts::PI;
pub const HALF_PI: f64 = consts::FRAC_PI_2;
pub const QUARTER_PI: f64 = consts::FRAC_PI_4;
pub const TWOPI: f64 = consts::TAU;

/// Solid angle of the full sphere, steradians.
pub const FOUR_PI_SR: f64 = 2.0 * consts::TAU;

pub const DEG_TO_RAD: f64 = consts::PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / consts::PI;
