//! Error handling utilities for MCP server

use arbor_core::WbsError;
use rmcp::ErrorData;

/// Convert an engine error into an MCP error.
///
/// Rejected requests (unknown IDs, level mismatches, bad input) become
/// `invalid_params` so the client can correct its call; storage failures
/// stay `internal_error`.
pub fn to_mcp_error(message: &str, error: &WbsError) -> ErrorData {
    let message = format!("{message}: {error}");
    if error.is_client_error() {
        ErrorData::invalid_params(message, None)
    } else {
        ErrorData::internal_error(message, None)
    }
}

pub fn not_found(kind: &str, id: u64) -> ErrorData {
    ErrorData::invalid_params(format!("{kind} with ID {id} not found"), None)
}
