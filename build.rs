use std::{
    env,
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

const ASSETS_DIR: &str = "assets";

fn main() {
    println!("cargo:rerun-if-changed={ASSETS_DIR}");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let table = resource_table(&manifest_dir.join(ASSETS_DIR));
    fs::write(out_dir.join("embedded_resources.rs"), table).expect("write embedded resource table");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        let mut res = winresource::WindowsResource::new();
        res.set("FileDescription", "Cat Wallpaper Installer");
        res.set("ProductName", "Cat Wallpaper Installer");
        if let Err(e) = res.compile() {
            println!("cargo:warning=failed to embed Windows version resource: {e}");
        }
    }
}

/// Every regular file in `assets/` becomes one entry keyed by its file stem.
fn resource_table(assets_dir: &Path) -> String {
    let mut files: Vec<PathBuf> = fs::read_dir(assets_dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect()
        })
        .unwrap_or_default();
    files.sort();

    let mut out = String::from("pub(crate) static EMBEDDED_RESOURCES: &[(&str, &[u8])] = &[\n");
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        println!("cargo:rerun-if-changed={}", path.display());
        let absolute = path.canonicalize().unwrap_or(path.clone());
        let _ = writeln!(
            out,
            "    ({:?}, include_bytes!({:?})),",
            stem,
            absolute.to_string_lossy()
        );
    }
    out.push_str("];\n");
    out
}
