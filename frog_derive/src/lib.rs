mod codec;

/// Reads each field in declaration order.
///
/// `#[fixed_str(len)]` reads a `FixedString` from a `len` byte budget.
#[proc_macro_derive(Readable, attributes(fixed_str))]
pub fn derive_readable(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	codec::derive_readable_impl(&syn::parse_macro_input!(tokens)).into()
}

/// Writes each field in declaration order.
///
/// `#[fixed_str(len)]` / `#[fixed_str(len, pad)]` writes a `FixedString` into a `len` byte
/// budget. Decoded strings replay their stored bytes; others are zero-terminated and filled with
/// `pad` (default 0).
#[proc_macro_derive(Writable, attributes(fixed_str))]
pub fn derive_writable(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	codec::derive_writable_impl(&syn::parse_macro_input!(tokens)).into()
}
