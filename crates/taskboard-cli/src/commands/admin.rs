//! Administrator account management.

use clap::{Args, Subcommand};
use validator::Validate;

use taskboard_core::error::AppError;
use taskboard_core::registry::RepositoryGetter;
use taskboard_core::result::AppResult;
use taskboard_core::traits::{Creator, SessionHandle, Updater};
use taskboard_core::types::Secret;
use taskboard_entity::user::{Profile, ProfileRepository, Role, User, UserRepository};

use super::Backend;
use crate::output;
use crate::password::hash_password;

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an administrator and its profile
    Create {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// First name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Replace the password of an existing account
    ResetPassword {
        #[arg(short, long)]
        username: String,
        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Debug, Validate)]
struct NewAdmin {
    #[validate(length(min = 3, max = 64, message = "Username must be 3 to 64 characters"))]
    username: String,
    #[validate(email(message = "Email is not valid"))]
    email: String,
    #[validate(length(min = 1, message = "Name is required"))]
    name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    last_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    password: String,
}

fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}

fn prompt(value: &Option<String>, label: &str) -> AppResult<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(label)
            .interact_text()
            .map_err(input_error),
    }
}

fn prompt_password(value: &Option<String>, label: &str) -> AppResult<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Password::new()
            .with_prompt(label)
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(input_error),
    }
}

pub async fn execute(args: &AdminArgs, backend: &Backend) -> AppResult<()> {

    match &args.command {
        AdminCommand::Create {
            username,
            email,
            name,
            last_name,
            password,
        } => {
            let input = NewAdmin {
                username: prompt(username, "Admin username")?,
                email: prompt(email, "Admin email")?,
                name: prompt(name, "First name")?,
                last_name: prompt(last_name, "Last name")?,
                password: prompt_password(password, "Admin password")?,
            };
            input
                .validate()
                .map_err(|e| AppError::validation(e.to_string()))?;

            let repositories = &backend.repositories;
            let user = backend
                .transaction(|session| create_admin(repositories, session, input))
                .await?;
            output::print_success(&format!(
                "Admin '{}' created (id: {})",
                user.username, user.data.id
            ));
        }
        AdminCommand::ResetPassword { username, password } => {
            let password = prompt_password(password, "New password")?;
            if password.len() < 8 {
                return Err(AppError::validation(
                    "Password must be at least 8 characters",
                ));
            }
            let hash = hash_password(&password)?;

            let repositories = &backend.repositories;
            backend
                .transaction(|session| async move {
                    let users = repositories.get::<dyn UserRepository>(&session)?;
                    let mut user = users
                        .by_username(username)
                        .await?
                        .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;
                    user.password = Secret::new(hash);
                    let id = user.data.id.clone();
                    users.update(&id, user).await
                })
                .await?;
            output::print_success(&format!("Password reset for '{username}'"));
        }
    }
    Ok(())
}

async fn create_admin(
    repositories: &RepositoryGetter,
    session: SessionHandle,
    input: NewAdmin,
) -> AppResult<User> {
    let users = repositories.get::<dyn UserRepository>(&session)?;
    let profiles = repositories.get::<dyn ProfileRepository>(&session)?;

    if users.by_username(&input.username).await?.is_some() {
        return Err(AppError::conflict(format!(
            "Username '{}' is already taken",
            input.username
        )));
    }
    if users.by_email(&input.email).await?.is_some() {
        return Err(AppError::conflict(format!(
            "Email '{}' is already registered",
            input.email
        )));
    }

    let hash = hash_password(&input.password)?;
    let user = users
        .create(User::new(
            input.name,
            input.last_name,
            input.username,
            input.email,
            hash,
            Role::Admin,
        ))
        .await?;
    profiles
        .create(Profile::new(&user.data.id, "", None))
        .await?;
    Ok(user)
}
