pub mod config;
pub mod due;
pub mod grade;
pub mod list;
pub mod make;
pub mod stats;
