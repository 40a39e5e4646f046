pub mod init;
pub mod render;
pub mod review;
pub mod stats;
pub mod study;
pub mod take;
pub mod validate;
