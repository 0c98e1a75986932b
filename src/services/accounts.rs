use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::db::{StoreError, UserStore};
use crate::error::ApiError;
use crate::middleware::auth::generate_token;
use crate::models::user::{
    AuthResponse, ProfileUpdate, SigninRequest, SignupRequest, User, UserProfile, UserRole,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    jwt_secret: Arc<str>,
    jwt_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_secret: &str,
        jwt_ttl_hours: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            jwt_secret: Arc::from(jwt_secret),
            jwt_ttl_hours,
            bcrypt_cost,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<AuthResponse, ApiError> {
        let auth_token = generate_token(user, &self.jwt_secret, self.jwt_ttl_hours)
            .map_err(|err| ApiError::Unexpected(format!("token generation failed: {}", err)))?;
        Ok(AuthResponse {
            auth_token,
            user: UserProfile::from(user),
        })
    }

    pub async fn signup(&self, input: SignupRequest) -> Result<AuthResponse, ApiError> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();
        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(StoreError::Duplicate("User").into());
        }

        let password = bcrypt::hash(&input.password, self.bcrypt_cost)
            .map_err(|err| ApiError::Unexpected(format!("password hashing failed: {}", err)))?;

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email,
            password,
            role: UserRole::User,
            profile_image: None,
            bio: None,
            preferences: input.preferences.unwrap_or_default(),
            stats: Default::default(),
            is_active: true,
            is_verified: false,
            last_login: Some(now),
            created_at: now,
            updated_at: now,
        };
        self.users.insert_user(&user).await?;
        log::info!("New account {}", user.id);

        self.issue_token(&user)
    }

    pub async fn signin(&self, input: SigninRequest) -> Result<AuthResponse, ApiError> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();
        let mut user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !bcrypt::verify(&input.password, &user.password).unwrap_or(false) {
            log::debug!("Failed sign-in for {}", user.id);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        if !user.is_active {
            return Err(ApiError::Unauthorized("Account is deactivated".to_string()));
        }

        let now = Utc::now();
        user.last_login = Some(now);
        user.updated_at = now;
        self.users.replace_user(&user).await?;

        self.issue_token(&user)
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or(ApiError::NotFound("User"))?;
        Ok(UserProfile::from(&user))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        update.validate()?;
        let mut user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or(ApiError::NotFound("User"))?;

        if let Some(first_name) = update.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        if let Some(image) = update.profile_image {
            user.profile_image = Some(image);
        }
        if let Some(preferences) = update.preferences {
            user.preferences = preferences;
        }
        user.updated_at = Utc::now();

        self.users.replace_user(&user).await?;
        Ok(UserProfile::from(&user))
    }
}
