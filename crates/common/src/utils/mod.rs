pub mod logging;
pub mod time_parse;
pub mod zero;
