use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};

use crate::errors::ServiceError;

pub mod roles;

pub use roles::{can_access, has_permission, Permission, Role};

/// The authenticated caller, as asserted by the gateway in front of us.
/// The gateway strips these headers from outside traffic, so a request
/// carrying them is one it already authenticated.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl FromRequest for Principal {
    type Error = ServiceError;
    type Future = Ready<Result<Principal, ServiceError>>;
    type Config = ();

    fn from_request(request: &HttpRequest, _: &mut Payload) -> Self::Future {
        match principal_from_headers(request) {
            Ok(principal) => ok(principal),
            Err(error) => err(error),
        }
    }
}

/// Fail the request unless the caller holds `permission`, with the
/// ownership refinement applied when the resource owner is known.
pub fn require(
    principal: &Principal,
    permission: Permission,
    resource_owner_id: Option<i64>,
) -> Result<(), ServiceError> {
    if !can_access(
        principal.role,
        permission,
        Some(principal.user_id),
        resource_owner_id,
    ) {
        forbidden!(format!("requires the {} permission", permission));
    }

    Ok(())
}

fn principal_from_headers(request: &HttpRequest) -> Result<Principal, ServiceError> {
    let user_id = header_value(request, "x-user-id")?
        .parse::<i64>()
        .map_err(|_| ServiceError::Unauthorized)?;

    let role = header_value(request, "x-user-role")?
        .parse::<Role>()
        .map_err(|_| ServiceError::Unauthorized)?;

    Ok(Principal { user_id, role })
}

fn header_value<'a>(request: &'a HttpRequest, name: &str) -> Result<&'a str, ServiceError> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(ServiceError::Unauthorized)
}
