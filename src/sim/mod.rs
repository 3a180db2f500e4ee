//! Frame-driven simulation
//!
//! Everything that moves lives here. The module is single-threaded and
//! deterministic for a given seed:
//! - Fixed per-frame step; timers run on a virtual clock
//! - Seeded RNG only
//! - Stable iteration order (collection order, ascending pair indices)
//! - No rendering or platform dependencies

pub mod blast;
pub mod collision;
pub mod events;
pub mod kinematics;
pub mod shape;
pub mod state;
pub mod tick;

pub use blast::{Blast, BlastReport, BlastState, BlastView};
pub use collision::{Impulse, detect_pairs, resolve, restitution};
pub use events::{EventQueue, SimEvent};
pub use kinematics::advance;
pub use shape::{Shape, ShapeKind, ShapeView, Tint};
pub use state::World;
pub use tick::{Frame, TickReport};
