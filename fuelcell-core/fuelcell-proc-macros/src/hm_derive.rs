use crate::imports::*;

fn has_field(fields: &syn::Fields, name: &str) -> bool {
    fields
        .iter()
        .any(|f| f.ident.as_ref().map_or(false, |ident| ident == name))
}

pub(crate) fn history_methods_derive(input: TokenStream) -> TokenStream {
    let item_struct = syn::parse_macro_input!(input as syn::ItemStruct);
    let ident = &item_struct.ident;
    let fields = &item_struct.fields;

    for name in ["state", "history", "save_interval"] {
        if !has_field(fields, name) {
            abort_call_site!("#[derive(HistoryMethods)] requires a `{}` field", name);
        }
    }

    quote! {
        impl #ident {
            /// Increments the step counter in `self.state`
            pub fn step(&mut self) {
                self.state.i += 1;
            }

            /// Saves `self.state` to `self.history` every `save_interval` steps
            pub fn save_state(&mut self) {
                if let Some(interval) = self.save_interval {
                    if interval > 0 && self.state.i % interval == 0 {
                        self.history.push(self.state);
                    }
                }
            }
        }
    }
    .into()
}
