//! Settings domain module.

mod model;

pub use model::{
    DEFAULT_API_BASE_URL, RemoteSettings, RemoteSettingsPayload, Settings, Theme,
};
