use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-env-changed=EBR_UPDATE_THRESHOLD");

    let out_dir = env::var("OUT_DIR").expect("no out directory");
    let dest = Path::new(&out_dir).join("build_constants.rs");

    let mut file = File::create(dest).expect("could not create file");

    let threshold: usize = env::var("EBR_UPDATE_THRESHOLD")
        .map_or(Ok(100), |var| var.parse())
        .expect("failed to parse env variable EBR_UPDATE_THRESHOLD");

    write!(&mut file, "const DEFAULT_UPDATE_THRESHOLD: usize = {};", threshold)
        .expect("could not write to file");
}
