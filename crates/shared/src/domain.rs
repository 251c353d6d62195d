use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(ArticleId);

/// Display identity of the signed-in user.
///
/// Derived from the bearer token payload or from the submitted login form; the
/// server stays the authority for every protected call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub login: String,
}

impl Identity {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}
