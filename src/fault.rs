use crate::Value;

use std::collections::BTreeMap;

/// A `<fault>` response, indicating that the server rejected the call.
///
/// The XML-RPC specification requires that a `<faultCode>` and `<faultString>` is returned in the
/// `<fault>` case, further describing the error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{string} ({code})")]
pub struct Fault {
    code: i32,
    string: String,
}

impl Fault {
    /// Creates a new `Fault` from an error code and a message.
    pub fn new<S: Into<String>>(code: i32, string: S) -> Fault {
        Fault {
            code,
            string: string.into(),
        }
    }

    /// Returns the fault code.
    ///
    /// The meaning of this code is not specified by XML-RPC and depends on the service you are
    /// talking to.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the `faultString` sent by the server.
    pub fn string(&self) -> &str {
        &self.string
    }

    /// Creates a `Fault` from a `Value`.
    ///
    /// The `Value` must be a `Value::Struct` with an `<int>` `faultCode` and a `<string>`
    /// `faultString` field. Additional members are ignored.
    ///
    /// Returns `None` if the value isn't a valid `Fault`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_struct()?;

        match (map.get("faultCode"), map.get("faultString")) {
            (Some(&Value::Int(code)), Some(&Value::String(ref string))) => {
                Some(Fault::new(code, string.as_str()))
            }
            _ => None,
        }
    }

    /// Turns this `Fault` into an equivalent `Value`.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::from(self.code));
        map.insert("faultString".to_string(), Value::from(self.string.as_str()));

        Value::Struct(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_roundtrip() {
        let input = Fault::new(-123456, "The Bald Lazy House Jumps Over The Hyperactive Kitten");

        assert_eq!(Fault::from_value(&input.to_value()), Some(input));
    }

    #[test]
    fn rejects_mistyped_fields() {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::from("4"));
        map.insert("faultString".to_string(), Value::from("Too many parameters."));

        assert_eq!(Fault::from_value(&Value::Struct(map)), None);
        assert_eq!(Fault::from_value(&Value::Int(4)), None);
    }

    #[test]
    fn displays_string_and_code() {
        assert_eq!(Fault::new(4, "Too many parameters.").to_string(), "Too many parameters. (4)");
    }
}
