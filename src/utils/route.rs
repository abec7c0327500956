//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Route label for metrics
///
/// Uses the matched resource pattern (`/posts/{id}/`) so ids do not explode
/// label cardinality. Unmatched paths collapse into a single label.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unmatched".to_string())
}
