// Static lookup tables shared by the scoring engine.
// Pure data: no I/O, no mutable state.

pub mod careers;
pub mod riasec;
pub mod skills;
