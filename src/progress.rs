// src/progress.rs
/// Lightweight progress reporting used by long-running operations.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one department reconstructed and validated.
    /// `index` is the department's position in the input file.
    fn item_done(&mut self, _index: usize, _name: &str) {}

    /// Called when one department failed, whatever the error policy.
    fn item_failed(&mut self, _index: usize, _name: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
