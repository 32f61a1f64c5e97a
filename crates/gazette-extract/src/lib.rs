//! Request extraction and response building for the Gazette blog server.
//!
//! The centerpiece is the field extraction pipeline in [`fields`]: handlers
//! declare an ordered list of [`FieldSpec`](gazette_core::FieldSpec)s per
//! source (session state or JSON body), and [`extract_fields`] either
//! short-circuits with the validator's error payload or yields a
//! [`FieldValues`] map of normalized values. The handler body only runs
//! with every declared field validated.
//!
//! [`ExtractionContext`] carries the parts of a request extractors read;
//! [`cookie`] parses request cookies and builds `Set-Cookie` headers;
//! [`response`] builds the JSON, HTML, and redirect responses handlers
//! return.

pub mod context;
pub mod cookie;
pub mod fields;
pub mod response;

pub use context::ExtractionContext;
pub use cookie::{Cookies, SetCookie};
pub use fields::{extract_fields, FieldValues};
