pub mod init;
pub mod inject;
