use serde::Serialize;
use tracing::debug;
use url::Url;

/// Pretty-print a payload alongside the address it targets, only when DEBUG is on.
pub(crate) fn debug_payload<T>(action: &str, address: &Url, value: &T)
where
    T: Serialize,
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    debug!(address = %address, "{action} payload:\n{pretty_json}");
}
