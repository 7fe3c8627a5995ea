//! Input classifiers and peripheral helpers.

pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod ir_remote;

/// Classified outcome of one physical activation (switch) or one
/// qualifying IR frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Released before the hold threshold.
    Press,
    /// Held past the hold threshold.
    Hold,
}
