//! Options capability traits.
//!
//! An options value bundles the parameters of one API call behind a small
//! interface. Read-only options produce a query string; write options also
//! produce a form body.

use std::fmt;

use crate::params::{PostData, QueryString};

/// Options for a call that only sends query parameters.
pub trait GetOptions {
    fn query_string(&self) -> QueryString;
}

/// Options for a call that sends query parameters and a form body.
pub trait PostOptions: GetOptions {
    fn post_data(&self) -> PostData;
}

impl<T: GetOptions + ?Sized> GetOptions for &T {
    fn query_string(&self) -> QueryString {
        (**self).query_string()
    }
}

impl<T: PostOptions + ?Sized> PostOptions for &T {
    fn post_data(&self) -> PostData {
        (**self).post_data()
    }
}

/// An options value as it arrives at the canonical dispatch path.
///
/// `Missing` stands for an options argument that was required but not
/// supplied, which is rejected when the request is built.
#[derive(Clone, Copy)]
pub enum OptionsArg<'a> {
    Missing,
    Get(&'a dyn GetOptions),
    Post(&'a dyn PostOptions),
}

impl<'a> OptionsArg<'a> {
    pub fn from_get<O: GetOptions + 'a>(options: Option<&'a O>) -> Self {
        match options {
            Some(options) => OptionsArg::Get(options),
            None => OptionsArg::Missing,
        }
    }

    pub fn from_post<O: PostOptions + 'a>(options: Option<&'a O>) -> Self {
        match options {
            Some(options) => OptionsArg::Post(options),
            None => OptionsArg::Missing,
        }
    }
}

impl fmt::Debug for OptionsArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsArg::Missing => f.write_str("Missing"),
            OptionsArg::Get(_) => f.write_str("Get(..)"),
            OptionsArg::Post(_) => f.write_str("Post(..)"),
        }
    }
}
