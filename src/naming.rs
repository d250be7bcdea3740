//=====================================================
// File: naming.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Convert between symbolic class names and file-system names
// Objective: Map CamelCase identifiers to underscore_case file stems and back
//            so autoload roots can mirror the class hierarchy on disk
//=====================================================

/// File-system form of a symbolic class name: an underscore before every
/// interior uppercase letter, everything lowercased. `HttpClient` becomes
/// `http_client`. Characters outside the letter/underscore convention pass
/// through untouched.
pub fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Symbolic form of a file-system name: the first letter and each letter
/// following an underscore are uppercased, underscores removed.
/// `http_client` becomes `HttpClient`.
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_splits_on_uppercase() {
        assert_eq!(underscore("HttpClient"), "http_client");
        assert_eq!(underscore("Mailer"), "mailer");
        assert_eq!(underscore("XmlHttpRequest"), "xml_http_request");
    }

    #[test]
    fn camelize_joins_segments() {
        assert_eq!(camelize("http_client"), "HttpClient");
        assert_eq!(camelize("mailer"), "Mailer");
        assert_eq!(camelize("xml_http_request"), "XmlHttpRequest");
    }

    #[test]
    fn transforms_are_inverses_for_conventional_names() {
        for name in ["A", "Alpha", "HttpClient", "DeepNestedNamespaceThing"] {
            assert_eq!(camelize(&underscore(name)), name);
        }
        for stem in ["a", "alpha", "http_client", "deep_nested_namespace_thing"] {
            assert_eq!(underscore(&camelize(stem)), stem);
        }
    }
}
