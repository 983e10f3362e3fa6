//! User account listing and deactivation.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use taskboard_core::config::AppConfig;
use taskboard_core::error::AppError;
use taskboard_core::result::AppResult;
use taskboard_core::traits::{Deleter, GetterList};
use taskboard_core::types::{FilterKind, ListQuery, OrderKind};
use taskboard_entity::user::permission::join_permissions;
use taskboard_entity::user::{User, UserRepository};

use super::Backend;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List active users, newest first
    List {
        /// Only usernames containing this text
        #[arg(short, long)]
        search: Option<String>,
        /// 1-based page number
        #[arg(short, long)]
        page: Option<u64>,
        /// Page size, capped by `repository.max_page_size`
        #[arg(short, long)]
        limit: Option<u64>,
    },
    /// Show one active user
    Show { username: String },
    /// Deactivate a user. The row is kept.
    Disable { username: String },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    name: String,
    permissions: String,
    created_at: String,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            name: user.full_name(),
            permissions: join_permissions(&user.permissions),
            created_at: user.data.created_at.format("%Y-%m-%d %H:%M").to_string(),
            id: user.data.id,
            username: user.username,
            email: user.email,
        }
    }
}

pub async fn execute(
    args: &UserArgs,
    backend: &Backend,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let repositories = &backend.repositories;

    match &args.command {
        UserCommand::List {
            search,
            page,
            limit,
        } => {
            let mut query = ListQuery {
                limit: *limit,
                page: *page,
                ..ListQuery::default()
            }
            .filter(FilterKind::Equal, "is_activated", true)
            .order_by("created_at", OrderKind::Desc);
            if let Some(search) = search {
                query = query.filter(FilterKind::Like, "username", search.as_str());
            }
            let criteria = query.into_criteria(repositories.filter_builder(), &config.repository)?;

            let users = backend
                .transaction(|session| async move {
                    let users = repositories.get::<dyn UserRepository>(&session)?;
                    users.filter(&criteria, &[]).await
                })
                .await?;
            output::print_page(&users.map(UserRow::from), format);
        }
        UserCommand::Show { username } => {
            let user = backend
                .transaction(|session| async move {
                    let users = repositories.get::<dyn UserRepository>(&session)?;
                    users.by_username(username).await
                })
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;
            output::print_item(&user, format);
        }
        UserCommand::Disable { username } => {
            backend
                .transaction(|session| async move {
                    let users = repositories.get::<dyn UserRepository>(&session)?;
                    let user = users
                        .by_username(username)
                        .await?
                        .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))?;
                    users.delete(&user.data.id).await
                })
                .await?;
            output::print_success(&format!("User '{username}' disabled"));
        }
    }
    Ok(())
}
