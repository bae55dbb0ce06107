pub mod assessment;
pub mod feedback;
pub mod job;
pub mod profile;
