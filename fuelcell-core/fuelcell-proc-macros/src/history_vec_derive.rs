use crate::imports::*;
use crate::utilities::*;

pub(crate) fn history_vec_derive(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);
    let state_name = &ast.ident;
    let history_name = Ident::new(
        &format!("{}HistoryVec", state_name.to_token_stream()),
        state_name.span(),
    );
    let fields: Vec<syn::Field> = match ast.data {
        syn::Data::Struct(s) => s.fields.into_iter().collect(),
        _ => abort_call_site!("#[derive(HistoryVec)] only works on structs"),
    };
    let field_names: Vec<&Ident> = fields.iter().filter_map(|f| f.ident.as_ref()).collect();
    if field_names.is_empty() || field_names.len() != fields.len() {
        abort_call_site!("#[derive(HistoryVec)] requires a struct with named fields");
    }
    let first_field = field_names[0];

    let vec_fields = fields
        .iter()
        .zip(&field_names)
        .map(|(f, ident)| {
            let ty = &f.ty;
            quote! { pub #ident: Vec<#ty>, }
        })
        .concat();

    let mut generated = TokenStream2::new();
    generated.append_all(quote! {
        #[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
        /// Column-wise record of saved states, one vec per field
        pub struct #history_name {
            #vec_fields
        }

        impl #history_name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Append every field of `value` to its column
            pub fn push(&mut self, value: #state_name) {
                #(self.#field_names.push(value.#field_names);)*
            }

            pub fn clear(&mut self) {
                #(self.#field_names.clear();)*
            }

            /// Reassemble the state saved at `idx`
            pub fn get(&self, idx: usize) -> Option<#state_name> {
                Some(#state_name {
                    #(#field_names: *self.#field_names.get(idx)?,)*
                })
            }

            /// Remove and return the last saved state
            pub fn pop(&mut self) -> Option<#state_name> {
                let last = self.get(self.len().checked_sub(1)?)?;
                #(self.#field_names.pop();)*
                Some(last)
            }

            pub fn len(&self) -> usize {
                self.#first_field.len()
            }

            pub fn is_empty(&self) -> bool {
                self.#first_field.is_empty()
            }
        }
    });
    generated.into()
}
