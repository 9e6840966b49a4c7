pub mod docs;
pub mod reports;
pub mod review;
