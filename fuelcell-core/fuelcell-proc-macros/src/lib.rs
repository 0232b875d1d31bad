mod imports;
use crate::imports::*;
mod history_vec_derive;
mod hm_derive;
mod serde_api_derive;
mod utilities;

#[proc_macro_error]
#[proc_macro_derive(HistoryVec)]
/// Generate `<Name>HistoryVec`, which acts like a vec of states but
/// stores each field of the state as its own vec field.
pub fn history_vec_derive(input: TokenStream) -> TokenStream {
    history_vec_derive::history_vec_derive(input)
}

#[proc_macro_error]
#[proc_macro_derive(HistoryMethods)]
/// Generate `step` and `save_state` methods for a struct with `state`,
/// `history` and `save_interval` fields.
pub fn history_methods_derive(input: TokenStream) -> TokenStream {
    hm_derive::history_methods_derive(input)
}

#[proc_macro_error]
#[proc_macro_derive(SerdeAPI)]
/// macro for deriving default implementation of SerdeAPI trait
pub fn serde_api_derive(item: TokenStream) -> TokenStream {
    serde_api_derive::serde_api_derive(item)
}
