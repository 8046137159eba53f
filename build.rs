#[cfg(feature = "gui")]
fn main() {
    let config = slint_build::CompilerConfiguration::new()
        .with_include_paths(vec!["ui".into(), "ui/components".into()]);
    slint_build::compile_with_config("ui/app.slint", config)
        .expect("Failed to compile the slint UI. Check ui/app.slint and its imports.");
}

#[cfg(not(feature = "gui"))]
fn main() {}
