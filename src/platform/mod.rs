//! Platform module for Luncurkan platform integration
//!
//! This module provides:
//! - API client for interacting with the Luncurkan Platform API
//! - Deployment assembly from project metadata, repo config and overrides
//! - Endpoint probing for deployed applications
//! - Identifier and domain generation

pub mod api;
pub mod assembler;
pub mod dependency;
pub mod domains;
pub mod ids;
pub mod probe;

pub use assembler::{DeploymentAssembler, DeploymentOutcome, DeploymentOverrides};
pub use probe::{EndpointProbe, ProbeRequest, ProbeResponse};
