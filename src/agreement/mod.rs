//! Proportional agreement between raters, per pair and per segment.

mod aggregate;
mod pairwise;
#[cfg(test)]
mod tests;

pub use aggregate::aggregate;
pub use pairwise::pair_agreement;
