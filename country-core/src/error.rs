use thiserror::Error;

/// Failures the directory can name precisely. Everything else travels as
/// `anyhow::Error` with context attached at the call site.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{service} request failed with status {status}: {body}")]
    HttpStatus {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("GraphQL endpoint returned errors: {}", .0.join("; "))]
    Graphql(Vec<String>),

    #[error("GraphQL response contained no data")]
    MissingData,

    #[error(
        "No weather API key configured.\n\
         Hint: run `countries configure` or set OPEN_WEATHER_API_KEY."
    )]
    MissingApiKey,

    #[error("Country '{0}' not found")]
    UnknownCountry(String),

    #[error("No coordinates known for country code '{0}'")]
    NoCoordinates(String),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
