pub use proc_macro::TokenStream;
pub use proc_macro2::TokenStream as TokenStream2;
pub use proc_macro_error::{abort_call_site, proc_macro_error};
pub use quote::{quote, ToTokens, TokenStreamExt};
pub use syn::{DeriveInput, Ident};
