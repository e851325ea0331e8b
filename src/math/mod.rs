pub mod par;
pub mod poly;
pub mod stats;
