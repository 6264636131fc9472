//! Simulation components: spot-path generation, the margin roll-forward,
//! and the residual-price heatmap.

pub mod heatmap;
pub mod margin;
pub mod path;
