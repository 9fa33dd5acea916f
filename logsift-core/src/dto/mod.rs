//! Data Transfer Objects for the remote services
//!
//! This module contains the request and response bodies exchanged with the
//! GitHub Actions API and the analysis service. Optional fields are modeled
//! explicitly so that unexpected shapes are handled at the boundary.

pub mod analysis;
pub mod github;
