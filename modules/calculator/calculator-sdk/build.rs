//! Generates the tonic client and server stubs for `calculator.v1.CalculatorService`.
//!
//! Message types are declared with `prost` derives in `src/proto.rs`, so the
//! service is described with the manual builder and no `protoc` is required.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let calculate = tonic_build::manual::Method::builder()
        .name("calculate")
        .route_name("Calculate")
        .input_type("crate::proto::CalculationRequest")
        .output_type("crate::proto::CalculationResponse")
        .codec_path("tonic_prost::ProstCodec")
        .build();

    let service = tonic_build::manual::Service::builder()
        .name("CalculatorService")
        .package("calculator.v1")
        .method(calculate)
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
