pub mod content_type;
mod date_time;
mod headers;
mod requested_path;

pub use self::headers::*;

pub(crate) use self::date_time::*;
pub(crate) use self::requested_path::*;
