pub mod analyse;
pub mod init;
pub mod plan;
pub mod reset;
pub mod scores;
