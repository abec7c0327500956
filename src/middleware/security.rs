//! Security headers middleware implementation.

use crate::config::SecurityHeadersConfig;
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

/// Security headers middleware factory
///
/// Header values are resolved once from the config; values that are not
/// valid header text are skipped with a warning.
pub struct SecurityHeaders {
    headers: Rc<Vec<(HeaderName, HeaderValue)>>,
}

impl SecurityHeaders {
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self {
            headers: Rc::new(resolve_headers(&config)),
        }
    }
}

fn resolve_headers(config: &SecurityHeadersConfig) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = Vec::new();
    let mut push = |name: &'static str, value: &str| match HeaderValue::from_str(value) {
        Ok(value) => headers.push((HeaderName::from_static(name), value)),
        Err(_) => tracing::warn!(header = name, "Skipping security header with invalid value"),
    };

    if config.content_type_options {
        push("x-content-type-options", "nosniff");
    }
    push("x-frame-options", &config.frame_options);
    if config.xss_protection {
        push("x-xss-protection", "1; mode=block");
    }
    push("referrer-policy", &config.referrer_policy);
    if config.csp_enabled {
        push("content-security-policy", &config.csp_directives);
    }
    if config.hsts_enabled {
        push("strict-transport-security", &format!("max-age={}", config.hsts_max_age));
    }

    headers
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service,
            headers: Rc::clone(&self.headers),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: S,
    headers: Rc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        let headers = Rc::clone(&self.headers);

        Box::pin(async move {
            let mut res = fut.await?;
            let response_headers = res.headers_mut();
            for (name, value) in headers.iter() {
                response_headers.insert(name.clone(), value.clone());
            }
            Ok(res)
        })
    }
}
