use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Display};

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 104
    }

    pub fn is_conflict_error(&self) -> bool {
        self.code == 105
    }

    pub fn status_code(&self) -> StatusCode {
        match self.code {
            101 => StatusCode::BAD_REQUEST,
            103 => StatusCode::SERVICE_UNAVAILABLE,
            104 => StatusCode::NOT_FOUND,
            105 => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // unique_violation
            if db_err.code().as_deref() == Some("23505") {
                return conflict_error(db_err.message());
            }
        }

        database_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        unexpected_error(format!("malformed document: {}", err))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<&str> = err.field_errors().keys().copied().collect();
        fields.sort_unstable();

        invalid_input_error(format!("invalid fields: {}", fields.join(", ")))
    }
}

impl From<JsonRejection> for Error {
    fn from(err: JsonRejection) -> Self {
        invalid_input_error(err.to_string())
    }
}

impl From<QueryRejection> for Error {
    fn from(err: QueryRejection) -> Self {
        invalid_input_error(err.to_string())
    }
}

impl From<lettre::error::Error> for Error {
    fn from(err: lettre::error::Error) -> Self {
        mail_error(err)
    }
}

impl From<lettre::address::AddressError> for Error {
    fn from(err: lettre::address::AddressError) -> Self {
        mail_error(err)
    }
}

impl From<lettre::transport::smtp::Error> for Error {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        mail_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "code": self.code,
            "error": self.message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        message: message.into(),
    }
}

pub fn unhealthy_error(detail: impl Display) -> Error {
    Error {
        code: 103,
        message: format!("service unhealthy: {}", detail),
    }
}

pub fn not_found_error(resource: &str) -> Error {
    Error {
        code: 104,
        message: format!("{} not found", resource),
    }
}

pub fn conflict_error(detail: impl Display) -> Error {
    Error {
        code: 105,
        message: format!("conflict: {}", detail),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error {
        code: 1,
        message: format!("environment variable error: {}", err),
    }
}

pub fn config_error(detail: impl Display) -> Error {
    Error {
        code: 1,
        message: format!("configuration error: {}", detail),
    }
}

pub fn database_error<T: Display>(err: T) -> Error {
    Error {
        code: 2,
        message: format!("database error: {}", err),
    }
}

pub fn mail_error<T: Display>(err: T) -> Error {
    Error {
        code: 3,
        message: format!("mail error: {}", err),
    }
}

pub fn unexpected_error(detail: impl Display) -> Error {
    Error {
        code: 5,
        message: detail.to_string(),
    }
}

#[test]
fn status_code_mapping_test() {
    assert_eq!(
        invalid_input_error("bad").status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(not_found_error("Trip").status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        unhealthy_error("down").status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        database_error("boom").status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(not_found_error("Trip").message, "Trip not found");
}
