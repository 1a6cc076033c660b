// Centralized tolerances for picking and geometry

pub const EPS_LEN: f64 = 1e-12; // zero-length segment threshold (world^2)

// Picking defaults, in screen pixels
pub const NODE_PICK_RADIUS_PX: f64 = 6.0;
pub const EDGE_PICK_THRESHOLD_PX: f64 = 5.0;

#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }
