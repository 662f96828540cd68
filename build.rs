//! Build script compiling the C rungs of the combine ladder.

use std::env;

fn main() {
    println!("cargo:rustc-check-cfg=cfg(c_implementation_active)");
    println!("cargo:rerun-if-changed=build.rs");

    let compiler = cc::Build::new().get_compiler();

    let compiler_name = if compiler.is_like_msvc() {
        "MSVC"
    } else if compiler.is_like_clang() {
        // Vanilla clang shares Rust's LLVM backend, which makes the comparison meaningless.
        // Apple Clang is the only clang accepted.
        if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "macos" {
            println!("cargo:warning=Vanilla Clang detected. C rungs disabled (requires GCC, MSVC, or Apple Clang).");
            return;
        }
        "Apple Clang"
    } else if compiler.is_like_gnu() {
        "GCC"
    } else {
        println!("cargo:warning=C compiler is not compatible (needs GCC, Apple Clang, or MSVC). C rungs disabled.");
        return;
    };

    let rustflags = env::var("RUSTFLAGS").unwrap_or_default();
    let encoded_rustflags = env::var("CARGO_ENCODED_RUSTFLAGS").unwrap_or_default();
    let is_rust_native =
        rustflags.contains("target-cpu=native") || encoded_rustflags.contains("target-cpu=native");

    let mut build = cc::Build::new();

    let c_files = glob::glob("src/**/*.c")
        .expect("Failed to read glob pattern")
        .filter_map(|entry| entry.ok());

    for file in c_files {
        println!("cargo:rerun-if-changed={}", file.display());
        build.file(file);
    }

    build.opt_level(3);

    if is_rust_native {
        build.flag_if_supported("-march=native");
        println!("cargo:warning=Detected Rust target-cpu=native. Enabling -march=native for C compilation.");
    }

    build.compile("combine_c");

    println!("cargo:rustc-cfg=c_implementation_active");
    println!("cargo:rustc-env=C_COMPILER_NAME={}", compiler_name);
}
