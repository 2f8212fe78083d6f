//! Small `ciborium::Value` accessors shared by the COSE and attestation codecs.

use ciborium::value::Value;

pub(crate) fn as_map(v: &Value) -> Option<&[(Value, Value)]> {
    match v { Value::Map(m) => Some(m), _ => None }
}

pub(crate) fn as_bytes(v: &Value) -> Option<&[u8]> {
    match v { Value::Bytes(b) => Some(b), _ => None }
}

pub(crate) fn as_text(v: &Value) -> Option<&str> {
    match v { Value::Text(s) => Some(s), _ => None }
}

pub(crate) fn as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Integer(i) => i64::try_from(i128::from(*i)).ok(),
        _ => None,
    }
}

pub(crate) fn get_int<'a>(map: &'a [(Value, Value)], key: i64) -> Option<&'a Value> {
    let target = Value::Integer(key.into());
    map.iter().find(|(k, _)| k == &target).map(|(_, v)| v)
}

pub(crate) fn get_text<'a>(map: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Text(s) if s == key))
        .map(|(_, v)| v)
}
