//! Translation run configuration.

use std::{
    ffi::OsStr,
    path::PathBuf,
};

#[derive(Debug, Clone)]
pub struct Config {
    /// A `.vm` file or a directory of them
    pub input: PathBuf,
    /// Where to write the assembly (None = derived from `input`)
    pub output: Option<PathBuf>,
    /// Emit `SP=256; call Sys.init 0` once, ahead of all units
    pub bootstrap: bool,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            bootstrap: false,
        }
    }

    /// `X.vm` becomes `X.asm`; a directory `D` becomes `D/D.asm`.
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        if !self.input.is_dir() {
            return self.input.with_extension("asm");
        }

        let dir = self
            .input
            .canonicalize()
            .unwrap_or_else(|_| self.input.clone());
        let name = dir
            .file_name()
            .unwrap_or_else(|| OsStr::new("out"))
            .to_string_lossy()
            .into_owned();
        self.input.join(format!("{}.asm", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_output_replaces_extension() {
        let config = Config::new("prog/Main.vm");
        assert_eq!(config.output_path(), PathBuf::from("prog/Main.asm"));
    }

    #[test]
    fn explicit_output_wins() {
        let mut config = Config::new("Main.vm");
        config.output = Some(PathBuf::from("out/prog.asm"));
        assert_eq!(config.output_path(), PathBuf::from("out/prog.asm"));
    }

    #[test]
    fn directory_output_is_named_after_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("FibonacciElement");
        std::fs::create_dir(&project).unwrap();
        let config = Config::new(&project);
        assert_eq!(config.output_path(), project.join("FibonacciElement.asm"));
    }
}
