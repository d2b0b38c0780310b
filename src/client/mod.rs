//! Transport collaborator: the operations the writable resources call, and a
//! blocking HTTP implementation of them.

mod api;
mod auth;
mod parse;
mod personio;

pub use api::PersonioApi;
pub use personio::{DEFAULT_BASE_URL, Personio};
