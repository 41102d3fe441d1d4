//! Request extractors.
//!
//! - [`actor::CurrentActor`] -- resolves the acting user from `X-User-Id`.

pub mod actor;
