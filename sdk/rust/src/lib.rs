//! HTTP client for the AAZ development server.

pub mod client;

pub use client::{AazClient, ApiFailure, ClientError, ModuleSummary};
