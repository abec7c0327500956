use vergen::EmitBuilder;

fn main() {
    // Outside a git checkout vergen emits placeholder values instead of failing
    EmitBuilder::builder()
        .build_timestamp()
        .git_sha(true)
        .emit()
        .expect("Unable to generate build metadata");
}
