use std::path::PathBuf;

pub const SPHERE_NORMAL: &str = "sphere-normal.png";
pub const DOTS: &str = "dots.png";
pub const STRIPES: &str = "stripes.png";
pub const NOISE: &str = "noise.png";

/// Resolve a bundled image asset relative to the crate root.
pub fn asset_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_assets_exist_and_decode() {
        for name in [SPHERE_NORMAL, DOTS, STRIPES, NOISE] {
            let path = asset_path(name);
            assert!(path.exists(), "missing asset {}", path.display());

            let img = image::open(&path).expect("asset decodes");
            assert!(img.width() > 0 && img.height() > 0);
        }
    }
}
