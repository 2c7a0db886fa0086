pub mod repl;

use anyhow::anyhow;

/// Turns any `Debug` error, including ones that are not `std::error::Error`
/// such as parser error lists, into an `anyhow::Error`.
pub trait ResultExt<T> {
    fn staticalize(self) -> anyhow::Result<T>;
}
impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    fn staticalize(self) -> anyhow::Result<T> {
        self.map_err(|e| anyhow!("{e:?}"))
    }
}
