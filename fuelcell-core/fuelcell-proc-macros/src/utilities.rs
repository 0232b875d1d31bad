use crate::imports::*;

/// Joins an iterator of token streams into a single stream
pub(crate) trait TokenStreamIterator {
    fn concat(self) -> TokenStream2;
}

impl<T: Iterator<Item = TokenStream2>> TokenStreamIterator for T {
    fn concat(self) -> TokenStream2 {
        let mut joined = TokenStream2::new();
        joined.extend(self);
        joined
    }
}
