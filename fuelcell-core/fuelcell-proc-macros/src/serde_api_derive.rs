use crate::imports::*;

pub(crate) fn serde_api_derive(input: TokenStream) -> TokenStream {
    let item = syn::parse_macro_input!(input as syn::Item);
    let (ident, generics) = match &item {
        syn::Item::Struct(item_struct) => (&item_struct.ident, &item_struct.generics),
        syn::Item::Enum(item_enum) => (&item_enum.ident, &item_enum.generics),
        _ => abort_call_site!("Unsupported item type. Only structs and enums are supported."),
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics SerdeAPI for #ident #ty_generics #where_clause {}
    }
    .into()
}
