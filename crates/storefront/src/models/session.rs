//! Session-related types.
//!
//! Everything a visitor accumulates lives in the session: the cart, the
//! catalog selection, the typed-but-not-yet-submitted customer form, and the
//! submission state machine. The store is in-memory; all of it lasts exactly
//! as long as the process.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the visitor's cart ([`apteka_core::Cart`]).
    pub const CART: &str = "cart";

    /// Key for the catalog selection ([`crate::catalog::Catalog`]).
    pub const CATALOG: &str = "catalog";

    /// Key for the customer form values ([`apteka_core::CustomerInfo`]).
    ///
    /// Saved on every submit attempt so the form survives page reloads; a
    /// successful order deliberately does not clear it.
    pub const CUSTOMER_INFO: &str = "customer_info";

    /// Key for the submission state machine ([`apteka_core::Submission`]).
    pub const SUBMISSION: &str = "submission";
}
