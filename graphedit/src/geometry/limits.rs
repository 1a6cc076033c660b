// Centralized ingestion limits to harden against untrusted documents

// Document size caps
pub const MAX_NODES: usize = 200_000;
pub const MAX_EDGES: usize = 300_000;

// Node ids index a slot table; cap the table size an import may request
pub const MAX_NODE_ID: u32 = 1_000_000;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 = 10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && (COORD_MIN..=COORD_MAX).contains(&x) }

#[inline]
pub fn in_id_bounds(id: u32) -> bool { id <= MAX_NODE_ID }

// View scale range (screen px per world unit); keeps both transforms finite
pub const MIN_SCALE: f64 = 1e-3;
pub const MAX_SCALE: f64 = 1e6;

#[inline]
pub fn in_scale_bounds(s: f64) -> bool { s.is_finite() && (MIN_SCALE..=MAX_SCALE).contains(&s) }

#[inline]
pub fn in_position_bounds(x: f64, y: f64) -> bool { in_coord_bounds(x) && in_coord_bounds(y) }
