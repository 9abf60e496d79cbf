#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::module_name_repetitions
)]

mod error;
pub use error::*;

mod grid;
pub use grid::*;

mod coords;
pub use coords::*;

mod viewport;
pub use viewport::*;

mod node;
pub use node::*;

pub mod glsl;

mod display;
pub use display::*;

mod grid_display;
pub use grid_display::*;

mod controller;
pub use controller::*;
