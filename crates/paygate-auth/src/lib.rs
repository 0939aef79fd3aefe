//! PayGate Authentication Layer
//!
//! Decides whether the current user may see the gated fields.
//!
//! # Components
//!
//! 1. **[`IdentityObserver`]**: subscribable cell holding the identity the
//!    provider last reported. Only an [`IdentityPublisher`] can change it.
//! 2. **[`AuthorizationGate`]**: derives [`AccessState`] from the live
//!    identity and a fixed [`Allowlist`](paygate_core::Allowlist).
//! 3. **[`SignInController`]**: runs provider sign-in/sign-out, keeps at most
//!    one sign-in outstanding and classifies failures into [`ErrorKind`].
//!
//! # Security Model
//!
//! The allowlist check runs on the client and is a convenience gate, not a
//! security boundary. Membership is exact and case-sensitive.
//!
//! # Example
//!
//! ```rust
//! use paygate_auth::{derive_access_state, AccessState};
//! use paygate_core::{Allowlist, Identity};
//!
//! let allowlist = Allowlist::new(["tung.42@gmail.com"]);
//! let identity = Identity::signed_in("tung.42@gmail.com");
//! assert_eq!(derive_access_state(&identity, &allowlist), AccessState::Allowed);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod gate;
pub mod identity;
pub mod provider;
pub mod signin;

pub use error::{ErrorKind, ProviderError};
pub use gate::{derive_access_state, AccessState, AuthorizationGate};
pub use identity::{IdentityObserver, IdentityPublisher};
pub use provider::IdentityProvider;
pub use signin::{SignInController, SignInOutcome, SignInStatus};
