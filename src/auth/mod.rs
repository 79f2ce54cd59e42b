//! Authorization layer
//!
//! Pure predicates answering "may this actor do this?" and their
//! `require_*` companions that turn a refusal into the matching domain
//! error. Nothing in this module touches the database: callers fetch the
//! resource first and pass it in, so every decision is a function of its
//! arguments and can be tested without I/O.

pub mod predicates;

pub use predicates::{
    is_active_admin, is_admin, is_admin_or_owner, is_authenticated, is_resource_owner, is_self,
    require_admin, require_authenticated, require_owner_or_admin, require_self_or_admin, Owned,
};
