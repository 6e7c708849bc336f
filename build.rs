const UI_ENTRY: &str = "ui/app-window.slint";

fn main() {
    println!("cargo:rerun-if-changed=ui");

    let config = slint_build::CompilerConfiguration::new().with_style("fluent".into());
    slint_build::compile_with_config(UI_ENTRY, config).expect("Slint build failed");
}
