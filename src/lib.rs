//! Client library for the V-Gen image generation service.
//!
//! The service exposes two generation profiles, "fast" (low latency) and
//! "quality" (high fidelity), behind near-identical HTTP endpoints. This
//! crate provides the request client ([`StudioClient`]), a locally simulated
//! progress ramp ([`ProgressSimulator`]), and a generic per-profile
//! [`GenerationController`] that ties validation, progress, and result
//! rendering together over a [`DisplaySink`].

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod logger;
pub mod models;
pub mod progress;
pub mod showcase;

pub use client::StudioClient;
pub use config::{ApiConfig, ControllerConfig};
pub use controller::{ControllerState, DisplaySink, GenerationController, SubmitOutcome};
pub use error::{Result, VgenError};
pub use models::{
    ApiErrorBody, GenerationRequest, GenerationResult, ImageData, ModelKind, ProgressState,
};
pub use progress::ProgressSimulator;
pub use showcase::{Showcase, ShowcaseItem};
