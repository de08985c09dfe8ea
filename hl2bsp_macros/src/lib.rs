use quote::quote;
use syn::*;

/// Automatically implements `BspValue` on structs with named fields, reading each field in declaration order.
///
/// VBSP structs are packed, so the resulting `bsp_struct_size` is the plain sum of the field sizes. Any alignment
/// padding present on disk has to be spelled out as an explicit field.
#[proc_macro_derive(BspValue)]
pub fn bsp_value_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	let ident = input.ident;

	let (bsp_parse_contents, bsp_struct_size_contents) = match input.data {
		Data::Struct(data) => match data.fields {
			Fields::Named(fields) => {
				let types = fields.named.iter().map(|field| &field.ty);
				let field_names = fields.named.iter().map(|field| field.ident.as_ref().expect("Ident required"));

				(
					quote! {
						Ok(Self {
							#(
								#field_names: ::hl2bsp::BspParseResultDoingJobExt::job(::hl2bsp::reader::BspValue::bsp_parse(reader), concat!(
									"Reading field \"",
										stringify!(#field_names),
										"\" on type ",
										stringify!(#ident)
								))?,
							)*
						})
					},
					quote! { #(<#types as ::hl2bsp::reader::BspValue>::bsp_struct_size() + )* 0 },
				)
			}
			Fields::Unnamed(_) => panic!("Tuple structs not supported"),
			Fields::Unit => panic!("Unit structs not supported"),
		},
		_ => panic!("Only structs with named fields are supported"),
	};

	quote! {
		impl ::hl2bsp::reader::BspValue for #ident {
			fn bsp_parse(reader: &mut ::hl2bsp::reader::BspByteReader) -> ::hl2bsp::BspResult<Self> {
				#bsp_parse_contents
			}
			fn bsp_struct_size() -> usize {
				#bsp_struct_size_contents
			}
		}
	}
	.into()
}
