//! Theme styling for the builder views.
//!
//! Views take a `&dyn Theme` and build styles from its semantic roles via the
//! helpers here rather than hard-coding colors.

pub mod helpers;
pub mod nord;
pub mod roles;

pub use nord::NordTheme;
pub use roles::Theme;
