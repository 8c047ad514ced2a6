use anyhow::Result;
use portal_application::PortalContext;
use portal_infrastructure::ClientConfig;

pub async fn run(context: &PortalContext, config: &ClientConfig) -> Result<()> {
    let bootstrap = context.bootstrap().await;

    println!("{} {}", config.app_title, config.app_version);
    println!("  API:      {}", config.api_url);
    println!("  Theme:    {}", bootstrap.theme.as_str());
    match context.session.user_profile() {
        Some(user) if bootstrap.authenticated => {
            println!("  Session:  signed in as {} <{}>", user.display_name(), user.email);
        }
        _ => println!("  Session:  signed out"),
    }

    let error = context.session.auth_error();
    if !error.is_empty() {
        println!("  Last error: {}", error);
    }
    Ok(())
}

pub fn env(config: &ClientConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&config.environment_info())?);
    Ok(())
}
