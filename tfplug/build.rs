//! Compiles the Terraform plugin protocol definitions.
//!
//! The bundled `protoc` is used unless `PROTOC` is already set, so the crate
//! builds on machines without a system protobuf compiler.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()?;
        std::env::set_var("PROTOC", protoc);
    }

    tonic_build::configure()
        .build_client(false)
        .compile_protos(&["proto/tfplugin6.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/tfplugin6.proto");
    Ok(())
}
