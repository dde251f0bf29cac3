//! graffle2svg Core Types
//!
//! This crate provides the foundational types shared by the graffle2svg
//! crates. It includes:
//!
//! - **Colors**: OmniGraffle color triples and their hex encoding ([`color::Color`])
//! - **Geometry**: Points, bounding boxes and point-list transforms ([`geometry`] module)
//! - **Style**: The cascading presentation-style stack ([`style::StyleCascade`])

pub mod color;
pub mod geometry;
pub mod style;
