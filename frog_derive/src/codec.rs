use std::borrow::Cow;
use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, ToTokens};
use syn::{
	parse::Parser, punctuated::Punctuated, Data, DataStruct, DeriveInput, Expr, Field, Fields,
	FieldsNamed, FieldsUnnamed, Index, Member, Meta, MetaList, Token,
};

/// Arguments of the field's `#[fixed_str(..)]`, if it has one.
fn fixed_str_args(field: &Field) -> Option<&TokenStream> {
	let mut found = None;
	for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("fixed_str")) {
		let Meta::List(MetaList { tokens, .. }) = &attr.meta else {
			panic!("#[fixed_str] needs arguments: #[fixed_str(len)] or #[fixed_str(len, pad)]");
		};
		if found.replace(tokens).is_some() {
			panic!("#[fixed_str] used more than once on one field");
		}
	}
	found
}

enum FieldCodec {
	/// Read/write through the field type's own impl
	Delegate,
	/// `FixedString` stored in a fixed byte budget
	FixedStr { len: Expr, pad: TokenStream },
}

fn field_codec(field: &Field) -> FieldCodec {
	let Some(tokens) = fixed_str_args(field) else {
		return FieldCodec::Delegate;
	};
	let args = Punctuated::<Expr, Token![,]>::parse_terminated
		.parse2(tokens.clone())
		.unwrap_or_else(|e| panic!("invalid #[fixed_str] arguments: {}", e));
	let mut args = args.into_iter();
	let len = args.next().expect("#[fixed_str] requires a byte length");
	let pad = match args.next() {
		Some(pad) => pad.into_token_stream(),
		None => quote! { 0u8 },
	};
	if args.next().is_some() {
		panic!("#[fixed_str] takes a byte length and an optional pad byte");
	}
	FieldCodec::FixedStr { len, pad }
}

fn struct_fields(input: &DeriveInput) -> (Vec<&Field>, bool) {
	match &input.data {
		Data::Struct(DataStruct { fields: Fields::Named(FieldsNamed { named, .. }), .. }) => (named.iter().collect(), false),
		Data::Struct(DataStruct { fields: Fields::Unnamed(FieldsUnnamed { unnamed, .. }), .. }) => (unnamed.iter().collect(), true),
		Data::Struct(DataStruct { fields: Fields::Unit, .. }) => (vec![], false),
		_ => panic!("only structs are supported"),
	}
}

fn binding(field: &Field, index: usize) -> Cow<Ident> {
	match &field.ident {
		Some(ident) => Cow::Borrowed(ident),
		None => Cow::Owned(Ident::new(&format!("field{}", index), Span::call_site())),
	}
}

fn member(field: &Field, index: usize) -> Member {
	match &field.ident {
		Some(ident) => Member::Named(ident.clone()),
		None => Member::Unnamed(Index::from(index)),
	}
}

pub fn derive_readable_impl(input: &DeriveInput) -> TokenStream {
	let (fields, tuple) = struct_fields(input);
	let mut body = quote! {};
	let mut initializer = quote! {};
	for (index, field) in fields.into_iter().enumerate() {
		let binding = binding(field, index);
		let expr = match field_codec(field) {
			FieldCodec::Delegate => quote! { frog_reader::Readable::read(reader)? },
			FieldCodec::FixedStr { len, .. } => quote! { reader.read_fixed(#len)? },
		};
		body = quote! {
			#body
			let #binding = #expr;
		};
		initializer = quote! { #initializer #binding, };
	}
	let initializer = if tuple { quote! { (#initializer) } } else { quote! { {#initializer} } };
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	quote! {
		impl #impl_generics frog_reader::Readable for #type_name #ty_generics #where_clause {
			fn read(reader: &mut frog_reader::DataReader) -> frog_reader::Result<Self> {
				#body
				Ok(#type_name #initializer)
			}
		}
	}
}

pub fn derive_writable_impl(input: &DeriveInput) -> TokenStream {
	let (fields, _) = struct_fields(input);
	let mut body = quote! {};
	for (index, field) in fields.into_iter().enumerate() {
		let member = member(field, index);
		let stmt = match field_codec(field) {
			FieldCodec::Delegate => quote! { frog_reader::Writable::write(&self.#member, writer)?; },
			FieldCodec::FixedStr { len, pad } => quote! { writer.write_fixed(&self.#member, #len, #pad); },
		};
		body = quote! { #body #stmt };
	}
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	quote! {
		impl #impl_generics frog_reader::Writable for #type_name #ty_generics #where_clause {
			fn write(&self, writer: &mut frog_reader::DataWriter) -> frog_reader::Result<()> {
				#body
				Ok(())
			}
		}
	}
}
