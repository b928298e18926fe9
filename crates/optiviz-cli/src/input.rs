//! Reading query, plan and AST inputs

use std::io::Read;
use std::path::Path;

use anyhow::Context;

/// Path value that selects standard input
pub const STDIN_PATH: &str = "-";

/// Reads a whole input, from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new(STDIN_PATH) {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read standard input")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Rejects more than one input bound to stdin.
pub fn ensure_single_stdin<'a>(paths: impl IntoIterator<Item = &'a Path>) -> anyhow::Result<()> {
    let stdin_inputs = paths
        .into_iter()
        .filter(|path| *path == Path::new(STDIN_PATH))
        .count();

    anyhow::ensure!(stdin_inputs <= 1, "only one input can be read from stdin");
    Ok(())
}
