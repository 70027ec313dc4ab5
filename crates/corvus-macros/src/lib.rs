//! Derive macros used by the corvus compiler crates.

mod error;

use proc_macro::TokenStream;

/// Implements `CorvusErrorTrait` for a diagnostic struct or enum.
///
/// See [`error`] for the supported `#[diagnostic]`, `#[label("...")]`,
/// `#[source_code]`, `#[help]`, `#[errors]` and `#[reference]` attributes.
#[proc_macro_derive(CorvusError, attributes(diagnostic, label, source_code, help, errors, reference))]
pub fn corvus_error(input: TokenStream) -> TokenStream {
    error::corvus_error(input)
}
