//! Subcommand implementations.
//!
//! Each command writes to the given writer so it can be driven from tests.

use std::io::Write;

use strata::{file_extension, Loader, Map, Value};
use tracing::info;

use crate::args::{Command, OutputFormat};
use crate::error::CliResult;

/// Runs a parsed subcommand, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if resolving or loading fails or output cannot be
/// written.
pub fn run(command: &Command, out: &mut impl Write) -> CliResult<()> {
    match command {
        Command::Resolve { paths } => resolve(&loader_for(paths), out),
        Command::Dump { paths, output } => dump(&loader_for(paths), *output, out),
    }
}

fn loader_for(paths: &[String]) -> Loader {
    let mut loader = Loader::with_default_formats();
    for pattern in paths {
        loader.add_config_path(pattern.as_str());
    }
    loader
}

/// Prints each resolved file with the extension that decodes it.
///
/// Files no decoder is registered for are listed as skipped, since `load`
/// passes over them.
///
/// # Errors
///
/// Returns an error if a pattern is malformed or matches a directory.
pub fn resolve(loader: &Loader, out: &mut impl Write) -> CliResult<()> {
    let files = loader.resolve_paths()?;
    info!(files = files.len(), "resolved configuration files");

    for path in &files {
        let extension = file_extension(path);
        if loader.has_format(&extension) {
            writeln!(out, "{}\t{extension}", path.display())?;
        } else {
            writeln!(out, "{}\tskipped", path.display())?;
        }
    }
    Ok(())
}

/// Loads every matched file into one tree and prints it.
///
/// # Errors
///
/// Returns an error if loading fails or the tree cannot be serialized.
pub fn dump(loader: &Loader, format: OutputFormat, out: &mut impl Write) -> CliResult<()> {
    let mut tree = Value::Map(Map::new());
    loader.load(&mut tree)?;

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &tree)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, &tree)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.toml"), "name = \"base\"\n[db]\nhost = \"localhost\"\n").unwrap();
        fs::write(dir.path().join("b.yaml"), "db:\n  port: 5432\n").unwrap();
        fs::write(dir.path().join("c.txt"), "ignored").unwrap();
        dir
    }

    fn pattern(dir: &tempfile::TempDir) -> String {
        dir.path().join("*").to_string_lossy().into_owned()
    }

    #[test]
    fn test_resolve_marks_skipped_files() {
        let dir = fixture();
        let mut out = Vec::new();
        resolve(&loader_for(&[pattern(&dir)]), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("a.toml\t.toml"));
        assert!(lines[1].ends_with("b.yaml\t.yaml"));
        assert!(lines[2].ends_with("c.txt\tskipped"));
    }

    #[test]
    fn test_dump_json_merges_files() {
        let dir = fixture();
        let mut out = Vec::new();
        dump(&loader_for(&[pattern(&dir)]), OutputFormat::Json, &mut out).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["name"], "base");
        assert_eq!(parsed["db"]["host"], "localhost");
        assert_eq!(parsed["db"]["port"], 5432);
    }

    #[test]
    fn test_dump_yaml() {
        let dir = fixture();
        let mut out = Vec::new();
        dump(&loader_for(&[pattern(&dir)]), OutputFormat::Yaml, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("name: base"));
        assert!(text.contains("port: 5432"));
    }

    #[test]
    fn test_resolve_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("conf.d")).unwrap();

        let mut out = Vec::new();
        let result = resolve(&loader_for(&[pattern(&dir)]), &mut out);
        assert!(result.is_err());
    }
}
