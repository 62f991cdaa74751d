use crate::models::user::{Role, User, UserLoginRequest, UserLoginResponse, UserRegistrationRequest};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::MySqlPool;
use validator::Validate;

pub struct UserService {
    pool: MySqlPool,
}

impl UserService {
    pub fn new(pool: MySqlPool) -> Self {
        UserService { pool }
    }

    // Register a new user
    pub async fn register_user(&self, request: UserRegistrationRequest) -> AppResult<i32> {
        request.validate()?;

        let hashed_password = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        // The username uniqueness constraint is the authority; concurrent
        // registrations of the same name lose here, not in a pre-check
        let result = sqlx::query("INSERT INTO user (username, password, role) VALUES (?, ?, 'USER')")
            .bind(&request.username)
            .bind(&hashed_password)
            .execute(&self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err)
                    if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
                {
                    AppError::Conflict(format!("Username '{}' already exists", request.username))
                }
                _ => err.into(),
            })?;

        Ok(result.last_insert_id() as i32)
    }

    // Login user
    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<UserLoginResponse> {
        let user: Option<User> =
            sqlx::query_as("SELECT id, username, password, role FROM user WHERE username = ?")
                .bind(&request.username)
                .fetch_optional(&self.pool)
                .await?;
        let user = user.ok_or_else(|| AppError::Unauthenticated("Invalid credentials".into()))?;

        // Verify password
        let password_matches = verify(request.password.as_bytes(), &user.password)
            .map_err(|e| AppError::Unauthenticated(e.to_string()))?;

        if !password_matches {
            return Err(AppError::Unauthenticated("Invalid credentials".into()));
        }

        // Generate JWT token carrying the role for the capability check
        let token = jwt::generate_token(user.id, user.role)
            .map_err(|e| AppError::Unauthenticated(e.to_string()))?;

        Ok(UserLoginResponse {
            token,
            user_id: user.id,
        })
    }

    /// Promote a user to administrator. Not exposed over HTTP; used by
    /// operators and the test harness to seed admin accounts.
    pub async fn set_role(&self, user_id: i32, role: Role) -> AppResult<()> {
        let existing = sqlx::query("SELECT id FROM user WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        sqlx::query("UPDATE user SET role = ? WHERE id = ?")
            .bind(role.to_string())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
