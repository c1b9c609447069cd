use serde::Deserialize;
use serde_json::Value;

/// Every backend response is wrapped as `{"meta": {...}, "data": {"body": ...}}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub data: Option<Data<T>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub http_code: Option<u16>,
    #[serde(default)]
    pub http_message: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Data<T> {
    pub body: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_body(self) -> Option<T> {
        self.data.and_then(|d| d.body)
    }
}

/// Best-effort read of an error envelope's message.
pub fn error_message(raw: &str) -> Option<String> {
    let meta = serde_json::from_str::<Envelope<Value>>(raw).ok()?.meta;
    meta.message
        .filter(|m| !m.is_empty())
        .or(meta.http_message)
}

/// The auth endpoints have shipped the token both as `data.body.access_token`
/// and as `data.access_token`.
pub fn access_token(raw: &Value) -> Option<&str> {
    raw.pointer("/data/body/access_token")
        .or_else(|| raw.pointer("/data/access_token"))
        .and_then(Value::as_str)
}

/// Login also hands out the refresh credential in the body, next to the
/// `refresh_token` cookie.
pub fn refresh_token(raw: &Value) -> Option<&str> {
    raw.pointer("/data/body/refresh_token")
        .or_else(|| raw.pointer("/data/refresh_token"))
        .and_then(Value::as_str)
}
