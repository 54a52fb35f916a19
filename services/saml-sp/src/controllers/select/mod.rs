mod request_matcher;
pub use self::request_matcher::*;
mod select_error;
pub use self::select_error::*;
mod select_provider;
pub use self::select_provider::*;
