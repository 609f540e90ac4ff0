pub mod roster;
pub mod report;
pub mod publisher;
pub mod pipeline;
pub mod scheduled;

#[cfg(test)]
pub(crate) mod testing;
