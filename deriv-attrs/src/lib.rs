mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait from `deriv-error` for the given struct.
///
/// The user-facing text of the error is provided through the `error` attribute:
///
/// ```ignore
/// use deriv_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("`{}` has no value", self.name),
///     labels = ["this variable"],
///     help = "bind it before evaluating",
/// )]
/// pub struct Unbound {
///     pub name: String,
/// }
/// ```
///
/// | Tag       | Description                                                                    |
/// | --------- | ------------------------------------------------------------------------------ |
/// | `message` | The headline of the error. Also returned verbatim by `ErrorKind::message`.     |
/// | `labels`  | An iterable of label texts, matched one-to-one with the spans of the error.    |
/// | `help`    | Optional help text describing how the error could be fixed.                    |
///
/// Each tag accepts an arbitrary expression, evaluated with `self` in scope. Only structs can
/// derive `ErrorKind`; the generated code refers to `::ariadne` and `::deriv_error`, so the
/// deriving crate must depend on both.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    let (impl_generics, ty_generics, where_clause) = target.generics.split_for_impl();
    quote! {
        impl #impl_generics ::deriv_error::ErrorKind for #name #ty_generics #where_clause {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            #target
        }
    }.into()
}
