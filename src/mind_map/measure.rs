//! Idea measurement.

use crate::tree::{Idea, Measure};

/// Supplies the rendered size of ideas.
///
/// Called during redraw for every idea that is new, whose title changed or
/// whose level changed since it was last measured. Returning None falls back
/// to the configured default measurement.
pub trait Measurer {
    fn measure(&self, idea: &Idea, level: u32) -> Option<Measure>;
}

impl<F> Measurer for F
where
    F: Fn(&Idea, u32) -> Option<Measure>,
{
    fn measure(&self, idea: &Idea, level: u32) -> Option<Measure> {
        self(idea, level)
    }
}
