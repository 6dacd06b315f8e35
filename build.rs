fn main() {
    // The bridge core builds headless; only the desktop shell needs Tauri codegen.
    if std::env::var_os("CARGO_FEATURE_DESKTOP").is_some() {
        // Declaring the commands generates the `allow-read-file` and
        // `allow-write-file` permissions referenced by capabilities/default.json.
        tauri_build::try_build(
            tauri_build::Attributes::new().app_manifest(
                tauri_build::AppManifest::new().commands(&["read_file", "write_file"]),
            ),
        )
        .expect("failed to run tauri-build");
    }
}
