pub mod errors;
pub mod db;
pub mod user;
pub mod company;
pub mod job;
