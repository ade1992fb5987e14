//! Layout computation for bookcase configurations.
//!
//! Turns a [`Configuration`](bookcase_core::Configuration) into absolute
//! positions: horizontal panel heights, vertical divider offsets, and the
//! resolved bounds of every compartment.
//!
//! # Coordinate convention
//!
//! Model space puts the floor at `y = 0`, centers the bookcase on `x = 0`,
//! and centers it in depth with the back face at `z = -depth / 2` and the
//! front face at `z = +depth / 2`. `+y` points up and `+z` toward the viewer.
//!
//! # Example
//!
//! ```
//! use bookcase_core::Configuration;
//! use bookcase_layout::compute_layout;
//!
//! let layout = compute_layout(&Configuration::default());
//! assert_eq!(layout.compartments.len(), 15);
//! ```

mod bounds;
mod compute;

pub use bounds::Bounds3;
pub use compute::{compute_layout, compute_layout_with_options, Compartment, Layout, LayoutOptions, MIN_SPAN};
