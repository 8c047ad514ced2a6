use anyhow::{Result, anyhow};
use portal_application::PortalContext;
use portal_core::auth::{Credentials, Registration};

pub async fn login(context: &PortalContext, email: String, password: String) -> Result<()> {
    context
        .session
        .login(&Credentials::new(email, password))
        .await
        .map_err(|message| anyhow!(message))?;

    print_signed_in(context);
    Ok(())
}

pub async fn register(
    context: &PortalContext,
    username: String,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<()> {
    let registration = Registration {
        username,
        email,
        password,
        first_name,
        last_name,
    };
    context
        .session
        .register(&registration)
        .await
        .map_err(|message| anyhow!(message))?;

    print_signed_in(context);
    Ok(())
}

pub fn logout(context: &PortalContext) {
    let was_signed_in = context.session.is_authenticated();
    context.session.logout();
    if was_signed_in {
        println!("👋 Signed out");
    } else {
        println!("Not signed in; stored session cleared anyway");
    }
}

fn print_signed_in(context: &PortalContext) {
    match context.session.user_profile() {
        Some(user) => println!("✅ Signed in as {} <{}>", user.display_name(), user.email),
        None => println!("✅ Signed in"),
    }
}
