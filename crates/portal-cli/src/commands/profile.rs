use anyhow::{Result, anyhow, bail};
use portal_application::PortalContext;
use portal_core::auth::PasswordChange;
use portal_core::user::ProfileUpdate;

pub async fn show(context: &PortalContext) -> Result<()> {
    if !context.session.check_auth().await {
        bail!("Not signed in. Run `portal login` first.");
    }
    let Some(user) = context.session.user_profile() else {
        bail!("No profile stored for this session");
    };

    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

pub async fn update(
    context: &PortalContext,
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<()> {
    let update = ProfileUpdate {
        username,
        email,
        first_name,
        last_name,
    };
    if update.is_empty() {
        bail!("Nothing to update; pass at least one field");
    }

    let user = context
        .session
        .update_profile(&update)
        .await
        .map_err(|message| anyhow!(message))?;

    println!("✅ Profile updated: {}", user.display_name());
    Ok(())
}

pub async fn change_password(context: &PortalContext, current: String, new: String) -> Result<()> {
    let change = PasswordChange {
        current_password: current,
        new_password: new,
    };
    context
        .session
        .change_password(&change)
        .await
        .map_err(|message| anyhow!(message))?;

    println!("✅ Password changed");
    Ok(())
}
