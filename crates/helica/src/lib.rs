#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use helica_linalg as linalg;

#[doc(inline)]
pub use helica_fha as fha;

#[doc(inline)]
pub use helica_glyph as glyph;

#[doc(inline)]
pub use helica_io as io;

#[doc(inline)]
pub use helica_session as session;
