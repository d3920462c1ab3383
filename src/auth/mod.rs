//! Authentication module
//!
//! The public endpoints need no credentials. Static credentials can still be
//! configured for proxies or gateways placed in front of the API; they are
//! attached to every request by the transport.

mod credentials;

pub use credentials::Credentials;

#[cfg(test)]
mod tests;
