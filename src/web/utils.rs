//! Web utility functions

use axum::http::{Method, Uri};
use tracing::{debug, info, warn};

use super::extractors::RequestContext;
use crate::errors::{AppError, AppResult};

/// Log an incoming HTTP request
pub fn log_request(method: &Method, uri: &Uri, context: &RequestContext) {
    debug!(
        method = %method,
        uri = %uri,
        request_id = %context.request_id,
        user_agent = ?context.user_agent,
        real_ip = ?context.real_ip,
        "HTTP request"
    );
}

/// Log the completion of an HTTP request
pub fn log_response(method: &Method, uri: &Uri, status: u16, request_id: &str, duration_ms: u64) {
    if status >= 400 {
        warn!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration_ms,
            "HTTP request completed with error"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %request_id,
            duration_ms = duration_ms,
            "HTTP request completed"
        );
    }
}

/// Parse an integer id path parameter
pub fn parse_id_param(param: &str) -> AppResult<i32> {
    param
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::validation(format!("Invalid id: {param}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_param() {
        assert_eq!(parse_id_param("17").unwrap(), 17);
        assert_eq!(parse_id_param(" 3 ").unwrap(), 3);
        assert!(matches!(
            parse_id_param("abc"),
            Err(AppError::Validation { .. })
        ));
        assert!(parse_id_param("").is_err());
    }
}
