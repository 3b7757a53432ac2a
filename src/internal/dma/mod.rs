//! DMA descriptor rings
//!
//! - [`DmaEngine`]: owns both descriptor rings and the pool buffers attached
//!   to them; transmit, receive, recycle and replenish all go through it
//! - `ring`: fixed-size circular index over a descriptor array
//! - [`descriptor`]: the enhanced-format descriptors shared with the hardware
//!
//! Descriptors live inside the engine, so the engine must stay at a fixed
//! address once [`DmaEngine::init`] has programmed the list base registers.

pub(crate) mod descriptor;
mod engine;
mod ring;

pub use engine::{DmaEngine, DmaStats};
