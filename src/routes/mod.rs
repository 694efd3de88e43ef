mod health_check;
mod subscriptions;
mod summary;

pub use health_check::*;
pub use subscriptions::*;
pub use summary::*;

/// Body of every error response: `{"message": "..."}`.
pub fn error_body(err: &impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "message": err.to_string() })
}

/// Writes the error followed by every cause in its `source()` chain.
pub fn error_chain_fmt(
    err: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    write!(f, "{}", err)?;

    let mut source = err.source();

    while let Some(cause) = source {
        write!(f, "\nCaused by:\n\t({})", cause)?;
        source = cause.source();
    }

    Ok(())
}
