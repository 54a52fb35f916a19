mod discovery_redirect;
pub use self::discovery_redirect::*;
mod view_renderer;
pub use self::view_renderer::*;
mod provider_selection_service;
pub use self::provider_selection_service::*;
