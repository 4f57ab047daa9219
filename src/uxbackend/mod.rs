//! UX Backend
//!
//! HTTP endpoints used by the console to onboard storage consumers:
//!
//! - `POST /onboarding-tokens`: issue a signed onboarding token, optionally
//!   carrying a storage quota
//! - `POST /info/deployment`: report which onboarding features are enabled

pub mod handlers;
pub mod quantity;
pub mod server;
pub mod token;

pub use handlers::{router, DeploymentCapability, HandlerState};
pub use quantity::parse_quantity;
pub use server::{UxBackendConfig, UxBackendServer, DEFAULT_PRIVATE_KEY_PATH, DEFAULT_TOKEN_LIFETIME_HOURS};
pub use token::{generate_onboarding_token, OnboardingTicket, TokenSigner};
