//! Service layer providing business-oriented operations on top of models.
//! - Separates journal logic (sanitization, image handling) from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod richtext;
pub mod files;
pub mod entry_service;
pub mod cleanup;
pub mod export;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
