//! Generic hex-grid storage: payload slots, shared edge/vertex topology,
//! coordinate conversion, line rasterization, and flood fill.

mod flood_fill;
mod hex_grid;
mod metrics;
mod topology;

pub use flood_fill::FloodFill;
pub use hex_grid::{HexGrid, MAX_RADIUS};
pub use metrics::HexMetrics;
pub use topology::{CellHolder, EdgeHolder, EdgeId, VertexHolder, VertexId};
