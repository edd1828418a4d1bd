//! `spendwise profile ...`

use super::{Context, prompt_password};
use crate::error::{CliError, request_failed};
use crate::output::{self, print_row};
use spendwise_api::ProfileUpdate;
use spendwise_core::Result;
use spendwise_session::Identity;

fn details(identity: &Identity) {
    print_row("Username", identity.username());
    print_row("Email", identity.email());
    let roles: Vec<&str> = identity.roles().roles().iter().map(|r| r.as_str()).collect();
    if !roles.is_empty() {
        print_row("Roles", &roles.join(", "));
    }
}

pub async fn show(ctx: &Context) -> Result<(), CliError> {
    let identity = ctx
        .protected(async { ctx.api().profile().show().await.map_err(request_failed) })
        .await?;

    output::print(&identity, ctx.format(), details);
    Ok(())
}

/// Edits the profile. With `change_password` the new password is prompted.
pub async fn update(
    ctx: &Context,
    username: Option<String>,
    email: Option<String>,
    change_password: bool,
) -> Result<(), CliError> {
    let mut update = ProfileUpdate {
        username: username.filter(|u| !u.trim().is_empty()),
        email: email.filter(|e| !e.trim().is_empty()),
        password: None,
    };
    if update.username.is_none() && update.email.is_none() && !change_password {
        return Err(
            CliError::input("nothing to update; pass --username, --email, or --password").into(),
        );
    }

    let identity = ctx
        .protected(async {
            if change_password {
                let password = prompt_password("New password: ")?;
                if prompt_password("Confirm new password: ")? != password {
                    return Err(CliError::input("passwords do not match").into());
                }
                update.password = Some(password);
            }
            ctx.api()
                .profile()
                .update(&update)
                .await
                .map_err(request_failed)
        })
        .await?;

    match identity {
        Some(identity) => output::print(&identity, ctx.format(), |identity| {
            println!("Profile updated");
            details(identity);
        }),
        None => output::print_success("Profile updated", ctx.format()),
    }
    Ok(())
}
