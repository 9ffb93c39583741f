pub mod classify;
pub mod policies;
