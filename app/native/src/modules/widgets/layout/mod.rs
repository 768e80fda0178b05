//! Layout algorithms for the widget engine.
//!
//! - `compute` derives a `RoomLayout` from registry data and persisted state
//! - `distributions` converts pinned widths to and from resizer positions

mod compute;
mod distributions;

pub use compute::compute_room_layout;
pub use distributions::{
    cumulative_distributions, normalized_widths, rounded_widths, widths_from_distributions,
};
