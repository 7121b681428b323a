//! Data Transfer Objects
//!
//! Payloads de request/response de la API HTTP.

pub mod calculator_dto;
pub mod common_dto;
pub mod directory_dto;
pub mod tariff_dto;
