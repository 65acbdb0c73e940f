pub mod lookup;

pub use lookup::{LookupBody, LookupParams, LookupRequest, ParamValue, DEFAULT_FORM_ID};
