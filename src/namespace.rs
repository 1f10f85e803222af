//! Namespace scopes and qualified names, as defined by Namespaces in XML 1.0.

/// The namespace the `xml` prefix is permanently bound to.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The namespace the `xmlns` prefix is permanently bound to.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Split a qualified name into prefix and local name.
///
/// Returns `None` for names that are not valid `QName`s: more than one colon, or an empty prefix
/// or local part.
pub(crate) fn split_qname(qname: &str) -> Option<(Option<&str>, &str)> {
    match qname.split_once(':') {
        None => Some((None, qname)),
        Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() && !local.contains(':') => {
            Some((Some(prefix), local))
        }
        Some(_) => None,
    }
}

/// A namespace declaration found among a start tag's attributes.
///
/// `xmlns="uri"` declares the default namespace and is reported with an empty prefix.
pub(crate) fn declared_prefix(attribute_name: &str) -> Option<&str> {
    if attribute_name == "xmlns" {
        Some("")
    } else {
        attribute_name.strip_prefix("xmlns:")
    }
}

/// One scope per open element. Lookups walk from the innermost scope outwards.
#[derive(Debug, Default)]
pub(crate) struct NamespaceStack {
    scopes: Vec<Vec<(String, String)>>,
}

impl NamespaceStack {
    pub(crate) fn push_scope(&mut self, bindings: Vec<(String, String)>) {
        self.scopes.push(bindings);
    }

    pub(crate) fn pop_scope(&mut self) -> Vec<(String, String)> {
        self.scopes.pop().unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Resolve a prefix to its namespace URI. The empty prefix resolves the default namespace;
    /// `xmlns=""` undeclares it.
    pub(crate) fn resolve(&self, prefix: &str) -> Option<&str> {
        match prefix {
            "xml" => return Some(XML_NAMESPACE),
            "xmlns" => return Some(XMLNS_NAMESPACE),
            _ => (),
        }

        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}

/// Why a namespace declaration is not allowed, if it isn't.
pub(crate) fn check_declaration(prefix: &str, uri: &str) -> Result<(), String> {
    if prefix == "xmlns" {
        Err("the `xmlns` prefix must not be declared".to_owned())
    } else if prefix == "xml" && uri != XML_NAMESPACE {
        Err(format!("the `xml` prefix must be bound to {}", XML_NAMESPACE))
    } else if prefix != "xml" && uri == XML_NAMESPACE {
        Err(format!("only the `xml` prefix may be bound to {}", XML_NAMESPACE))
    } else if uri == XMLNS_NAMESPACE {
        Err(format!("no prefix may be bound to {}", XMLNS_NAMESPACE))
    } else if !prefix.is_empty() && uri.is_empty() {
        Err(format!("prefix `{}` cannot be bound to an empty namespace", prefix))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("svg:rect"), Some((Some("svg"), "rect")));
        assert_eq!(split_qname("div"), Some((None, "div")));
        assert_eq!(split_qname(":local"), None);
        assert_eq!(split_qname("prefix:"), None);
        assert_eq!(split_qname("a:b:c"), None);
    }

    #[test]
    fn test_declared_prefix() {
        assert_eq!(declared_prefix("xmlns"), Some(""));
        assert_eq!(declared_prefix("xmlns:p"), Some("p"));
        assert_eq!(declared_prefix("xmlnsfoo"), None);
        assert_eq!(declared_prefix("href"), None);
    }

    #[test]
    fn test_lexical_scoping() {
        let mut stack = NamespaceStack::default();
        stack.push_scope(vec![
            ("".to_owned(), "urn:outer".to_owned()),
            ("p".to_owned(), "urn:p".to_owned()),
        ]);
        stack.push_scope(vec![("".to_owned(), "urn:inner".to_owned())]);

        assert_eq!(stack.resolve(""), Some("urn:inner"));
        assert_eq!(stack.resolve("p"), Some("urn:p"));
        assert_eq!(stack.resolve("q"), None);
        assert_eq!(stack.resolve("xml"), Some(XML_NAMESPACE));

        stack.pop_scope();
        assert_eq!(stack.resolve(""), Some("urn:outer"));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_undeclare_default() {
        let mut stack = NamespaceStack::default();
        stack.push_scope(vec![("".to_owned(), "urn:a".to_owned())]);
        stack.push_scope(vec![("".to_owned(), "".to_owned())]);
        assert_eq!(stack.resolve(""), None);
    }

    #[test]
    fn test_check_declaration() {
        assert!(check_declaration("p", "urn:p").is_ok());
        assert!(check_declaration("", "").is_ok());
        assert!(check_declaration("p", "").is_err());
        assert!(check_declaration("xmlns", "urn:x").is_err());
        assert!(check_declaration("xml", "urn:x").is_err());
        assert!(check_declaration("xml", XML_NAMESPACE).is_ok());
        assert!(check_declaration("p", XMLNS_NAMESPACE).is_err());
    }
}
