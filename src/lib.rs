pub mod codec;
pub mod config;
pub mod constants;
pub mod convert;
pub mod error;
pub mod interrupt;
pub mod media;
pub mod naming;
pub mod playlist;
pub mod utils;
