pub mod build;
pub mod init;
pub mod solutions;
pub mod validate;
