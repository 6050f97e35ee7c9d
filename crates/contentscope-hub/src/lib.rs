//! contentscope-hub
//!
//! Explicit registries owned by the application's composition root:
//! - [`EventBus`]: named publish/subscribe events
//! - [`CallbackHub`]: capability objects dispatched by type
//! - [`ActionRegistry`]: named parameterless actions
//! - [`InstanceRegistry`]: tracked instances under a [`LifecyclePolicy`]
//!
//! None of these hold global state; share them by reference or `Arc`.

pub mod actions;
pub mod callbacks;
pub mod error;
pub mod events;
pub mod instances;

pub use actions::ActionRegistry;
pub use callbacks::CallbackHub;
pub use error::{HubError, HubResult};
pub use events::{EventArg, EventBus, SubscriptionId};
pub use instances::{Admission, InstanceRegistry, LifecyclePolicy};
