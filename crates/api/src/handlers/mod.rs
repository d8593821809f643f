pub mod board;
pub mod demands;
pub mod health;
pub mod projects;
pub mod reports;
pub mod stages;
