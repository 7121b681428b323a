//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for communicating with external APIs.

pub mod fargo_client;

pub use fargo_client::FargoClient;
