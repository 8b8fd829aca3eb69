fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=assets/fonts");

    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    println!("cargo:rustc-env=STAMPKIT_BUILD_DATE={}", build_date);
    println!(
        "cargo:rustc-env=STAMPKIT_LONG_VERSION={} (built {})",
        version, build_date
    );
}
