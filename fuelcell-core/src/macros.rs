#[macro_export]
/// Generates a String similar to output of `dbg` but without printing
macro_rules! format_dbg {
    ($dbg_expr:expr) => {
        format!(
            "[{}:{}] {}: {:?}",
            file!(),
            line!(),
            stringify!($dbg_expr),
            $dbg_expr
        )
    };
    () => {
        format!("[{}:{}]", file!(), line!())
    };
}

#[macro_export]
/// Implements a validated setter on [FuelCell](crate::fuel_cell::FuelCell) that
/// writes `$field` of `self.params` and re-runs parameter validation, rolling
/// back the change if validation fails.
macro_rules! impl_validated_setter {
    ($(#[$docs:meta])* $setter: ident, $field: ident, $T: ty) => {
        $(#[$docs])*
        pub fn $setter(&mut self, $field: $T) -> anyhow::Result<()> {
            let previous = std::mem::replace(&mut self.params.$field, $field);
            if let Err(err) = self.params.validate_all() {
                self.params.$field = previous;
                return Err(err.context(format!(
                    "{}\ninvalid value for `{}`",
                    format_dbg!(),
                    stringify!($field)
                )));
            }
            Ok(())
        }
    };
}
