//! CLI command implementations

pub(crate) mod common;
pub(crate) mod erd;
pub(crate) mod evaluate;
pub(crate) mod export;
pub(crate) mod ls;
pub(crate) mod validate;
