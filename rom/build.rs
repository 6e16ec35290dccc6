use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=DEVKITPRO");

    // Only the bare-metal target links against libgba
    let target = env::var("TARGET").unwrap_or_default();
    if !target.starts_with("thumbv4t-none") && !target.starts_with("armv4t-none") {
        return;
    }

    let devkitpro = env::var("DEVKITPRO").unwrap_or_else(|_| "/opt/devkitpro".to_string());
    println!("cargo:rustc-link-search=native={devkitpro}/libgba/lib");
    println!("cargo:rustc-link-lib=static=gba");
    // crt0, the cartridge header and the memory map come from devkitARM
    println!("cargo:rustc-link-arg-bins=-specs=gba.specs");
}
