#[cfg(test)]
mod fake;
mod http;

#[cfg(test)]
pub use self::fake::*;
pub use self::http::*;
