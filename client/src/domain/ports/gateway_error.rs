//! Transport-level failures shared by the auth and workflow gateways.

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while talking to the backend.
    ///
    /// Backend rejections (`success: false`, compile diagnostics) are result
    /// values, not errors; this enum only covers failures of the
    /// request/response cycle itself.
    pub enum GatewayError {
        /// The request could not be sent or the response not received.
        Transport {
            /// Underlying client error text.
            message: String,
        } => "request failed: {message}",
        /// The configured request timeout elapsed.
        Timeout {
            /// Underlying client error text.
            message: String,
        } => "request timed out: {message}",
        /// The response body was not the expected JSON shape.
        Decode {
            /// Decoder error text.
            message: String,
        } => "unexpected response: {message}",
        /// A non-success status arrived without a decodable body.
        Status {
            /// HTTP status code.
            status: u16,
            /// Compact preview of the response body.
            message: String,
        } => "backend returned status {status}: {message}",
    }
}
