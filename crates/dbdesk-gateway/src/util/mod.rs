pub mod http;
pub mod time;
