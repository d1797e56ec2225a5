//! HTTP boundary.
//!
//! All outgoing requests go through the [`HttpClient`] trait so the loader and
//! API layer can be exercised against [`MockClient`] in tests.

mod client;

pub use client::{HttpClient, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder};
