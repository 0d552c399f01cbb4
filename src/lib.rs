//! Superscope — an embeddable scripting runtime for audio-reactive visuals.
//!
//! A superscope is four small scripts (init, frame, beat, point) that turn
//! timing and audio context into a cloud of `(x, y)` points each frame.
//! [`script`] compiles and evaluates the language, [`vm`] sequences the
//! phases for a host render loop.

pub mod host;
pub mod preset;
pub mod script;
pub mod vm;

pub use script::{Compiled, Compiler, Diagnostic};
pub use vm::{GlobalBuffer, Phase, ScopeConfig, ScriptSet, SuperscopeVm};
