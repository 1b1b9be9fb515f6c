//! Small helpers over quick-xml events.

use quick_xml::events::BytesStart;

/// Extract the local name from a potentially namespaced XML name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Value of the attribute whose local name is `key` (`r:embed` matches `embed`).
pub fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| local_name(a.key.as_ref()) == key)
        .map(|a| match a.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
        })
}

/// Integer attribute value.
pub fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// OOXML on/off attribute (`1`, `true`, `on` / `0`, `false`, `off`).
pub fn attr_bool(e: &BytesStart<'_>, key: &[u8]) -> Option<bool> {
    attr(e, key).and_then(|v| parse_on_off(&v))
}

/// Parse an OOXML boolean value.
pub fn parse_on_off(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" | "none" => Some(false),
        _ => None,
    }
}
