// src/utils/jwt.rs

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - teacher ID or student ID (as string), depending on `role`.
    pub sub: String,
    /// 'admin', 'teacher' or 'student'.
    pub role: String,
    /// Issued-at as Unix timestamp. For student tokens this is the exam start time.
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
    /// The exam a student token is bound to. Absent on staff tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_id: Option<i64>,
}

impl Claims {
    /// Parses `sub` as a numeric ID. A token we signed always carries one.
    pub fn subject_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }

    pub fn is_staff(&self) -> bool {
        self.role == ROLE_TEACHER || self.role == ROLE_ADMIN
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

fn now_secs() -> usize {
    chrono::Utc::now().timestamp().max(0) as usize
}

fn encode_claims(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Signs a token for a teacher or admin account.
pub fn sign_staff_jwt(
    id: i64,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let now = now_secs();
    let claims = Claims {
        sub: id.to_string(),
        role: role.to_owned(),
        iat: now,
        exp: now + expiration_seconds as usize,
        exam_id: None,
    };

    encode_claims(&claims, secret)
}

/// Signs an exam session token for a student.
///
/// The token is only valid for `exam_id` and carries the attempt window:
/// `iat` is the first start and `exp` the deadline. Reissuing for the same
/// attempt yields the same window, so restarting never buys extra time.
pub fn sign_student_jwt(
    student_id: i64,
    exam_id: i64,
    secret: &str,
    started_at: usize,
    expires_at: usize,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: student_id.to_string(),
        role: ROLE_STUDENT.to_owned(),
        iat: started_at,
        exp: expires_at,
        exam_id: Some(exam_id),
    };

    encode_claims(&claims, secret)
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    // Student tokens must die exactly at the deadline.
    validation.leeway = 0;

    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects `Claims`
/// into the request extensions. Returns 401 otherwise.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    match verify_jwt(token, &config.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Axum Middleware: teacher or admin only.
///
/// Must be layered inside `auth_middleware`. Returns 403 for student tokens.
pub async fn teacher_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !claims.is_staff() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}

/// Axum Middleware: student exam session only.
pub async fn student_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if claims.role != ROLE_STUDENT || claims.exam_id.is_none() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}
