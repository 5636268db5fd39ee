//! Plain header list with case-insensitive name handling.
//!
//! Strategies describe extra upstream headers without pulling an HTTP crate
//! into this layer; `aigw-core` converts at the transport boundary.

pub type Headers = Vec<(String, String)>;

pub fn header_get<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

pub fn header_set(headers: &mut Headers, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    let value = value.into();
    if let Some((_, v)) = headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        *v = value;
        return;
    }
    headers.push((name, value));
}

/// Adds the header only when no header of that name is present.
pub fn header_add_if_absent(headers: &mut Headers, name: &str, value: &str) {
    if header_get(headers, name).is_none() {
        headers.push((name.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_is_case_insensitive() {
        let headers = vec![("X-Api-Key".to_string(), "k".to_string())];
        assert_eq!(header_get(&headers, "x-api-key"), Some("k"));
        assert_eq!(header_get(&headers, "authorization"), None);
    }

    #[test]
    fn set_replaces_existing_name() {
        let mut headers = vec![("Accept".to_string(), "text/plain".to_string())];
        header_set(&mut headers, "accept", "application/json");
        assert_eq!(headers.len(), 1);
        assert_eq!(header_get(&headers, "Accept"), Some("application/json"));
    }

    #[test]
    fn add_if_absent_keeps_existing_value() {
        let mut headers = vec![("Authorization".to_string(), "Bearer a".to_string())];
        header_add_if_absent(&mut headers, "authorization", "Bearer b");
        header_add_if_absent(&mut headers, "x-extra", "1");
        assert_eq!(header_get(&headers, "Authorization"), Some("Bearer a"));
        assert_eq!(header_get(&headers, "x-extra"), Some("1"));
    }
}
