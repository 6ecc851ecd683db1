use std::fs;

use tracing::error;

/// Resolves a secret either from a file named by `file_var` (container
/// secrets) or directly from `var`.
///
/// `lookup` abstracts the environment so configuration can be loaded from
/// something other than the process environment in tests.
pub fn get_secret(
    lookup: &impl Fn(&str) -> Option<String>,
    file_var: &str,
    var: &str,
) -> Option<String> {
    if let Some(secret_file_path) = lookup(file_var) {
        // Found a file path, try to read the file
        match fs::read_to_string(&secret_file_path) {
            Ok(content) => Some(content.trim().to_string()),
            Err(e) => {
                error!(%secret_file_path, ?e, "Error reading secret file");
                None
            }
        }
    } else {
        lookup(var)
    }
}
