//! Helper functions for templates
//!
//! URL builders shared by the page renderer, the generator and the server.

mod url;

pub use url::*;
