//! Actix-web extractor for the forwarded caller identity.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use std::future::{Ready, ready};

use super::{Identity, UserRole};
use crate::config::{USER_ID_HEADER, USER_NAME_HEADER, USER_ROLE_HEADER};
use crate::error::ErrorResponse;

/// Read a header value as UTF-8, trimmed; None when missing or empty.
fn header_value(req: &HttpRequest, header_name: &str) -> Option<String> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a forwarded caller identity.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: AuthenticatedUser) -> impl Responder {
///     // auth.identity carries user id, display name, and role
/// }
/// ```
pub struct AuthenticatedUser {
    pub identity: Identity,
}

impl AuthenticatedUser {
    /// Whether the caller may see another engineer's data.
    pub fn can_view_owner(&self, owner_id: &str) -> bool {
        self.identity.is_supervisor() || self.identity.user_id == owner_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(user_id) = header_value(req, USER_ID_HEADER) else {
            return ready(Err(AuthError {
                message: format!("Missing {} header", USER_ID_HEADER),
            }));
        };

        let display_name = header_value(req, USER_NAME_HEADER).unwrap_or_else(|| user_id.clone());

        let role = match header_value(req, USER_ROLE_HEADER) {
            Some(raw) => match UserRole::parse(&raw) {
                Some(role) => role,
                None => {
                    return ready(Err(AuthError {
                        message: format!("Unknown role '{}'", raw),
                    }));
                }
            },
            None => {
                return ready(Err(AuthError {
                    message: format!("Missing {} header", USER_ROLE_HEADER),
                }));
            }
        };

        ready(Ok(AuthenticatedUser {
            identity: Identity {
                user_id,
                display_name,
                role,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_rt::test]
    async fn test_extracts_identity_from_headers() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "eng-42"))
            .insert_header((USER_NAME_HEADER, "R. Okafor"))
            .insert_header((USER_ROLE_HEADER, "engineer"))
            .to_http_request();

        let auth = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(auth.identity.user_id, "eng-42");
        assert_eq!(auth.identity.display_name, "R. Okafor");
        assert_eq!(auth.identity.role, UserRole::Engineer);
    }

    #[actix_rt::test]
    async fn test_missing_user_id_rejected() {
        let req = TestRequest::default()
            .insert_header((USER_ROLE_HEADER, "engineer"))
            .to_http_request();

        let result = AuthenticatedUser::from_request(&req, &mut Payload::None).await;
        assert!(result.is_err());
    }

    #[actix_rt::test]
    async fn test_unknown_role_rejected() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "eng-42"))
            .insert_header((USER_ROLE_HEADER, "wizard"))
            .to_http_request();

        let result = AuthenticatedUser::from_request(&req, &mut Payload::None).await;
        assert!(result.is_err());
    }

    #[actix_rt::test]
    async fn test_display_name_falls_back_to_id() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "sup-1"))
            .insert_header((USER_ROLE_HEADER, "supervisor"))
            .to_http_request();

        let auth = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(auth.identity.display_name, "sup-1");
        assert!(auth.identity.is_supervisor());
    }

    #[test]
    fn test_can_view_owner() {
        let engineer = AuthenticatedUser {
            identity: Identity {
                user_id: "eng-1".to_string(),
                display_name: "Eng One".to_string(),
                role: UserRole::Engineer,
            },
        };
        assert!(engineer.can_view_owner("eng-1"));
        assert!(!engineer.can_view_owner("eng-2"));

        let supervisor = AuthenticatedUser {
            identity: Identity {
                user_id: "sup-1".to_string(),
                display_name: "Sup One".to_string(),
                role: UserRole::Supervisor,
            },
        };
        assert!(supervisor.can_view_owner("eng-2"));
    }
}
