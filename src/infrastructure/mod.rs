pub mod memory;
pub mod models;
pub mod pdf;
pub mod smtp;
pub mod template_repo;
