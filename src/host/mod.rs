//! Host-side helpers: a beat source and a text preview.
//!
//! These stand in for the beat detector and renderer a real visualiser
//! provides; the CLI uses them to drive a [`SuperscopeVm`](crate::vm::SuperscopeVm).

pub mod clock;
pub mod plot;

pub use clock::BeatClock;
pub use plot::AsciiCanvas;
