//! Command handlers, one module per subcommand.

pub mod build;
pub mod completion;
pub mod config_cmd;
pub mod normalize;
pub mod validate;
pub mod version;

use anyhow::{Context, Result};

use crate::cli::SourceArgs;

/// Formula text named by `args`: the file's contents, or the positional
/// formulas joined by newlines.
pub(crate) fn read_source(args: &SourceArgs) -> Result<String> {
    match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read formula file: {}", path.display())),
        None => Ok(args.formulas.join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn positional_formulas_become_lines() {
        let args = SourceArgs {
            formulas: vec!["a.b()".into(), "c.d()".into()],
            file: None,
        };
        assert_eq!(read_source(&args).unwrap(), "a.b()\nc.d()");
    }

    #[test]
    fn missing_file_names_the_path() {
        let args = SourceArgs {
            formulas: Vec::new(),
            file: Some(PathBuf::from("/nonexistent/formulas.txt")),
        };
        let err = read_source(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/formulas.txt"));
    }
}
