// Generates the `shop.Shop` server and client stubs. The message types are
// written by hand in `src/grpc/proto.rs`, so no protoc is needed.
fn main() {
    let method = |name: &str, route: &str, input: &str, output: &str| {
        tonic_build::manual::Method::builder()
            .name(name)
            .route_name(route)
            .input_type(input)
            .output_type(output)
            .codec_path("tonic::codec::ProstCodec")
            .build()
    };

    let shop = tonic_build::manual::Service::builder()
        .name("Shop")
        .package("shop")
        .method(method("list", "List", "crate::grpc::proto::ListReq", "crate::grpc::proto::ListResp"))
        .method(method("incr", "Incr", "crate::grpc::proto::IncrReq", "crate::grpc::proto::IncrResp"))
        .build();

    tonic_build::manual::Builder::new().compile(&[shop]);
    println!("cargo:rerun-if-changed=build.rs");
}
