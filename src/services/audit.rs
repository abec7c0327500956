//! Emission of audit events to the log and the metrics registry.

use crate::{models::AuthAuditEvent, services::AppMetrics};
use actix_web::{HttpRequest, web};

/// Log an audit event and count it when metrics are registered
pub fn record_auth_event(req: &HttpRequest, event: AuthAuditEvent) {
    event.log();
    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_auth_event(event.event_type);
    }
}
