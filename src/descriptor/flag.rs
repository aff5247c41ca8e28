//! Flag - constant or form-dependent boolean

use std::fmt;
use std::sync::Arc;

use crate::value::FormData;

/// A boolean that is either fixed or computed from the current form
#[derive(Clone)]
pub enum Flag {
    /// Fixed value
    Const(bool),
    /// Predicate over the current form
    When(Arc<dyn Fn(&FormData) -> bool + Send + Sync>),
}

impl Flag {
    /// Create a predicate flag
    pub fn when(predicate: impl Fn(&FormData) -> bool + Send + Sync + 'static) -> Self {
        Flag::When(Arc::new(predicate))
    }

    /// Evaluate against a form
    pub fn eval(&self, form: &FormData) -> bool {
        match self {
            Flag::Const(value) => *value,
            Flag::When(predicate) => predicate(form),
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::Const(value)
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Const(value) => f.debug_tuple("Const").field(value).finish(),
            Flag::When(_) => f.write_str("When(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flag_eval() {
        let form = FormData::from_value(json!({"kind": "company"}));
        assert!(Flag::from(true).eval(&form));
        assert!(!Flag::Const(false).eval(&form));
        let is_company = Flag::when(|form| form.get("kind") == Some(&json!("company")));
        assert!(is_company.eval(&form));
        assert!(!is_company.eval(&FormData::new()));
    }
}
