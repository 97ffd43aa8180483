//! Request identity: session cookie, authenticated user and view name.
//!
//! The host application's authentication layer inserts
//! [`AuthenticatedUser`] into the request extensions; the session key is read
//! from the configured cookie.

use crate::flash::domain::{RequestIdentity, SessionKey, UserId};
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::{COOKIE, HeaderName};
use http::{Extensions, HeaderMap};
use tracing::debug;
use uuid::Uuid;

/// Authenticated caller, inserted into request extensions by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

/// Name of the view handling the request, recorded on new messages.
///
/// When absent the matched route path is used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewName(pub String);

/// Builds the identity of a request from its headers and extensions.
#[must_use]
pub fn request_identity(
    headers: &HeaderMap,
    extensions: &Extensions,
    cookie_name: &str,
) -> RequestIdentity {
    let mut identity = RequestIdentity::anonymous();
    if let Some(key) = session_cookie(headers, cookie_name) {
        identity = identity.with_session(key);
    }
    if let Some(AuthenticatedUser(user)) = extensions.get::<AuthenticatedUser>() {
        identity = identity.with_user(*user);
    }
    identity
}

/// Returns the view name for a request: [`ViewName`] if set, otherwise the
/// matched route, otherwise empty.
#[must_use]
pub fn view_name(extensions: &Extensions) -> String {
    if let Some(ViewName(name)) = extensions.get::<ViewName>() {
        return name.clone();
    }
    extensions
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_default()
}

/// Reads and validates the session key from the `Cookie` headers.
///
/// Malformed keys are ignored, which leaves the request without a session.
#[must_use]
pub fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<SessionKey> {
    let raw = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| cookie_value(cookies, cookie_name))?;
    match SessionKey::new(raw) {
        Ok(key) => Some(key),
        Err(err) => {
            debug!(error = %err, "ignoring malformed session cookie");
            None
        }
    }
}

fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().trim_matches('"'))
    })
}

/// Middleware trusting a header set by an authenticating reverse proxy.
///
/// When the header carries a UUID, the request is treated as authenticated
/// by that user. Only mount this behind a proxy that strips the header from
/// client requests.
pub async fn trust_user_header(
    State(header): State<HeaderName>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = request
        .headers()
        .get(&header)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .map(UserId::from_uuid);
    if let Some(user) = user {
        request.extensions_mut().insert(AuthenticatedUser(user));
    }
    next.run(request).await
}
