/*!
 * Validation checks that run before any synthesis cost is incurred.
 */

pub mod translation;

pub use translation::{TranslationValidator, ValidationOutcome};
