//! Subcommand implementations.

mod create;
mod delete;
mod get;
mod input;
mod list;
mod login;
mod logout;
mod refresh_token;
mod request;
mod update;
mod whoami;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new session (login)
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Refresh the session tokens
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// List a collection (e.g. case, client, invoice)
    List(list::ListArgs),

    /// Fetch a single item
    Get(get::GetArgs),

    /// Create an item in a collection
    Create(create::CreateArgs),

    /// Replace or patch an item
    Update(update::UpdateArgs),

    /// Delete an item
    Delete(delete::DeleteArgs),

    /// Send an arbitrary authenticated request
    Request(request::RequestArgs),
}

pub async fn handle(global: GlobalArgs, command: Command) -> Result<()> {
    match command {
        Command::Login(args) => login::run(&global, args).await,
        Command::Logout(args) => logout::run(&global, args),
        Command::Whoami(args) => whoami::run(&global, args),
        Command::RefreshToken(args) => refresh_token::run(&global, args).await,
        Command::List(args) => list::run(&global, args).await,
        Command::Get(args) => get::run(&global, args).await,
        Command::Create(args) => create::run(&global, args).await,
        Command::Update(args) => update::run(&global, args).await,
        Command::Delete(args) => delete::run(&global, args).await,
        Command::Request(args) => request::run(&global, args).await,
    }
}
