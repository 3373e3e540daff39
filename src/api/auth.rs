use crate::{
    api::{
        transport::{error_detail, TransportError},
        wire::{AuthResponse, LoginRequest, RegisterRequest, UserDto},
        ApiClient,
    },
    domain::identity::Identity,
    usecases::session::{AuthGateway, AuthSession, AuthSourceError, RegistrationProfile},
};

impl AuthGateway for ApiClient {
    fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthSourceError> {
        let response: AuthResponse = self
            .transport()
            .post_json("/api/auth/login", &LoginRequest { email, password })
            .map_err(map_transport_error)?;

        Ok(into_auth_session(response))
    }

    fn register(&self, profile: &RegistrationProfile) -> Result<AuthSession, AuthSourceError> {
        let response: AuthResponse = self
            .transport()
            .post_json(
                "/api/auth/register",
                &RegisterRequest {
                    email: &profile.email,
                    username: &profile.username,
                    password: &profile.password,
                    full_name: &profile.full_name,
                },
            )
            .map_err(map_transport_error)?;

        Ok(into_auth_session(response))
    }

    fn current_identity(&self) -> Result<Identity, AuthSourceError> {
        let user: UserDto = self
            .transport()
            .get_json("/api/auth/me", &[])
            .map_err(map_transport_error)?;

        Ok(user.into_identity())
    }
}

fn into_auth_session(response: AuthResponse) -> AuthSession {
    AuthSession {
        token: response.access_token,
        identity: response.user.into_identity(),
    }
}

fn map_transport_error(error: TransportError) -> AuthSourceError {
    match error {
        TransportError::Unauthorized => AuthSourceError::Unauthorized,
        TransportError::Network { message } => AuthSourceError::Unreachable { message },
        TransportError::Status { body, .. } => AuthSourceError::Rejected {
            detail: error_detail(&body),
        },
        TransportError::Decode { message } => AuthSourceError::Rejected {
            detail: format!("malformed response: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_unauthorized() {
        assert_eq!(
            map_transport_error(TransportError::Unauthorized),
            AuthSourceError::Unauthorized
        );
    }

    #[test]
    fn network_failure_maps_to_unreachable() {
        let err = map_transport_error(TransportError::Network {
            message: "connection refused".to_owned(),
        });

        assert_eq!(
            err,
            AuthSourceError::Unreachable {
                message: "connection refused".to_owned()
            }
        );
    }

    #[test]
    fn status_failure_surfaces_the_backend_detail() {
        let err = map_transport_error(TransportError::Status {
            status: 409,
            body: r#"{"error": "Email already exists"}"#.to_owned(),
        });

        assert_eq!(
            err,
            AuthSourceError::Rejected {
                detail: "Email already exists".to_owned()
            }
        );
    }
}
