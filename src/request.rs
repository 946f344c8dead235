use crate::utils::escape_xml;
use crate::Value;

use std::io::{self, Write};

/// A request to call a procedure.
#[derive(Clone, Debug)]
pub struct Request<'a> {
    name: &'a str,
    args: Vec<Value>,
}

impl<'a> Request<'a> {
    /// Creates a new request to call a function named `name`.
    ///
    /// By default, no arguments are passed. Use the `arg` method to append arguments.
    pub fn new(name: &'a str) -> Self {
        Request {
            name,
            args: Vec::new(),
        }
    }

    /// Creates a request to call `name` with an already assembled argument list.
    pub fn with_args(name: &'a str, args: &[Value]) -> Self {
        Request {
            name,
            args: args.to_vec(),
        }
    }

    /// Appends an argument to be passed to the current list of arguments.
    pub fn arg<T: Into<Value>>(mut self, value: T) -> Self {
        self.args.push(value.into());
        self
    }

    /// The name of the method this request calls.
    pub fn method(&self) -> &str {
        self.name
    }

    /// The positional arguments, in call order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Formats this `Request` as a UTF-8 encoded XML document.
    ///
    /// # Errors
    ///
    /// Any errors reported by the writer will be propagated to the caller. If the writer never
    /// returns an error, neither will this method.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> io::Result<()> {
        write!(fmt, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        write!(fmt, r#"<methodCall>"#)?;
        write!(fmt, r#"<methodName>{}</methodName>"#, escape_xml(self.name))?;
        write!(fmt, r#"<params>"#)?;
        for value in &self.args {
            write!(fmt, r#"<param>"#)?;
            value.write_as_xml(fmt)?;
            write!(fmt, r#"</param>"#)?;
        }
        write!(fmt, r#"</params>"#)?;
        write!(fmt, r#"</methodCall>"#)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_xml(req: &Request) -> String {
        let mut output: Vec<u8> = Vec::new();
        req.write_as_xml(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn escapes_method_names() {
        let req = Request::new("x<&x");

        assert!(to_xml(&req).contains("<methodName>x&lt;&amp;x</methodName>"));
    }

    #[test]
    fn writes_params_in_order() {
        let req = Request::new("authenticated_example.reverse").arg(8).arg(20);

        assert_eq!(
            to_xml(&req),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><methodCall>\
             <methodName>authenticated_example.reverse</methodName><params>\
             <param><value><i4>8</i4></value></param>\
             <param><value><i4>20</i4></value></param>\
             </params></methodCall>"
        );
    }

    #[test]
    fn with_args_matches_builder() {
        let built = Request::new("m").arg("a").arg(true);
        let listed = Request::with_args("m", &[Value::from("a"), Value::Bool(true)]);

        assert_eq!(built.args(), listed.args());
        assert_eq!(listed.method(), "m");
    }
}
