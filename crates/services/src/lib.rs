#![forbid(unsafe_code)]

pub mod app_services;
pub mod deployment_service;
pub mod error;
pub mod header_service;
pub mod key_service;
pub mod progress_service;
pub mod simulation;
pub mod subscription_service;
pub mod whitelist_service;

pub use onboard_core::Clock;

pub use app_services::AppServices;
pub use deployment_service::DeploymentService;
pub use error::{ActionError, AppServicesError};
pub use header_service::{
    CreatedHeader, HeaderRequest, HeaderService, VerificationDetails, VerificationReport,
    VerifyRequest,
};
pub use key_service::KeyService;
pub use progress_service::ProgressService;
pub use simulation::{
    ActionProfile, CancelHandle, CancelToken, FixedOutcomes, OutcomeProvider, RandomOutcomes,
    ScriptedOutcomes, SimulationProfile, simulate_latency,
};
pub use subscription_service::{SubscriptionReceipt, SubscriptionService};
pub use whitelist_service::{WhitelistOutcome, WhitelistService};
