pub mod compute;
pub mod inspect;
mod load;
mod report;
