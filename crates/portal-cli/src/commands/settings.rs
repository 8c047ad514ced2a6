use anyhow::{Result, anyhow};
use portal_application::PortalContext;
use serde_json::Value;

pub fn show(context: &PortalContext) -> Result<()> {
    let settings = context.settings.current_settings();
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub async fn set(context: &PortalContext, key: &str, raw: String) -> Result<()> {
    let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
    context.settings.update_setting(key, value);
    save(context).await
}

pub async fn save(context: &PortalContext) -> Result<()> {
    context
        .save_settings()
        .await
        .map_err(|message| anyhow!(message))?;

    if context.session.is_authenticated() {
        println!("✅ Settings saved and synced");
    } else {
        println!("✅ Settings saved locally");
    }
    Ok(())
}

pub fn reset(context: &PortalContext) {
    let theme = context.settings.reset();
    println!("✅ Settings reset to defaults (theme: {})", theme.as_str());
}

pub async fn toggle_theme(context: &PortalContext) -> Result<()> {
    let theme = context.settings.toggle_theme();
    println!("🎨 Theme: {}", theme.as_str());
    save(context).await
}
