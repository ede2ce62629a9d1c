//! Read models handed to the presentation layer.

pub mod view_state;
