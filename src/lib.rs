//! filebridge - a minimal file capability bridge between a privileged host
//! and a lower-trust context.
//!
//! The privileged side ([`runtime::host::FileHost`]) owns file access and the
//! messaging endpoint ([`ipc::IpcMain`]). Lower-trust code only ever receives
//! a [`Bridge`], which exposes `read_file`, `write_file` and `on_update`.
//! The desktop shell hands the same bridge to the webview as Tauri commands
//! and events.

pub mod api;
pub mod bridge;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod ipc;
pub mod runtime;

pub use api::types::{ApiError, FileUpdate, UpdateKind};
pub use bridge::{Bridge, CAPABILITIES};
pub use config::BridgeConfig;
pub use ipc::{Channel, IpcMain};
pub use runtime::fs::FsManager;
pub use runtime::host::FileHost;

#[cfg(all(feature = "desktop", debug_assertions))]
const BINDINGS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/bindings/filebridge.ts");

#[cfg(feature = "desktop")]
fn specta_builder() -> tauri_specta::Builder<tauri::Wry> {
    tauri_specta::Builder::<tauri::Wry>::new()
        .commands(tauri_specta::collect_commands![
            commands::files::read_file,
            commands::files::write_file
        ])
        .typ::<FileUpdate>()
}

#[cfg(all(feature = "desktop", debug_assertions))]
fn export_bindings(path: &std::path::Path) -> bool {
    match specta_builder().export(specta_typescript::Typescript::default(), path) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to export TypeScript bindings to {}: {e}", path.display());
            false
        }
    }
}

#[cfg(feature = "desktop")]
fn setup_bridge(app: &mut tauri::App) -> Result<(), Box<dyn std::error::Error>> {
    use tauri::Manager;

    let config_path = app.path().app_config_dir()?.join(config::CONFIG_FILE_NAME);
    let config = BridgeConfig::load(&config_path)?.with_env_overrides();

    app.handle().plugin(
        tauri_plugin_log::Builder::new()
            .level(config.log_level_filter())
            .build(),
    )?;

    // Exported here rather than in `run()` so a failure reaches the log plugin.
    #[cfg(debug_assertions)]
    export_bindings(std::path::Path::new(BINDINGS_PATH));

    let workspace_root = match &config.workspace_root {
        Some(root) => root.clone(),
        None => app.path().document_dir()?,
    };
    let workspace_root =
        runtime::path::canonicalize_workspace_root(&workspace_root.to_string_lossy())?;

    let ipc = IpcMain::new();
    FileHost::register(
        &ipc,
        FsManager::with_read_limit(workspace_root, config.max_read_bytes),
        config.notify_on_write,
    )?;

    let bridge: Bridge = Bridge::expose(&ipc);
    commands::updates::forward_updates(&bridge, app.handle().clone());
    app.manage(bridge);

    log::info!("Bridge ready: config={}", config_path.display());
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
#[cfg(feature = "desktop")]
pub fn run() {
    let builder = specta_builder();

    tauri::Builder::default()
        .invoke_handler(builder.invoke_handler())
        .setup(setup_bridge)
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#[cfg(all(test, feature = "desktop", debug_assertions))]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_export_bindings_covers_commands_and_update_type() {
        let path = std::env::temp_dir().join(format!("bindings_{}.ts", Uuid::new_v4()));
        assert!(export_bindings(&path));

        let generated = std::fs::read_to_string(&path).expect("failed to read bindings");
        assert!(generated.contains("\"read_file\""));
        assert!(generated.contains("\"write_file\""));
        assert!(generated.contains("FileUpdate"));

        std::fs::remove_file(&path).expect("failed to remove bindings");
    }

    #[test]
    fn test_export_bindings_reports_unwritable_target() {
        // A directory where the file should go cannot be written.
        let path = std::env::temp_dir().join(format!("bindings_dir_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("failed to create dir");
        assert!(!export_bindings(&path));
        std::fs::remove_dir_all(&path).expect("failed to remove dir");
    }
}
