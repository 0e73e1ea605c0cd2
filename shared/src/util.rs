//! Item identifier helpers

/// Prefix of a fully-qualified variant identifier on the commerce platform.
pub const VARIANT_GID_PREFIX: &str = "gid://shop/ProductVariant/";

/// Normalize a raw variant identifier to the fully-qualified form.
///
/// Storefront widgets send bare numeric ids; admin metadata stores full
/// gids. Both map to the same line in one pricing run.
pub fn variant_gid(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("gid://") {
        trimmed.to_string()
    } else {
        format!("{VARIANT_GID_PREFIX}{trimmed}")
    }
}
