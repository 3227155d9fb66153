//! Minimal CLI: load JSON programs → (check | glsl)
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, Args};
use colored::Colorize;
use rayon::prelude::*;

use crate::ir::Program;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile shader IR programs (JSON-encoded) into GLSL source
#[derive(Parser, Debug)]
#[command(name = "shaderir")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate and compile each program to GLSL
    Glsl(GlslOut),
    /// validate each program without emitting anything
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the program inside each document (e.g. /shaders/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GlslOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// directory for `<stem>.glsl` outputs (stdout if omitted)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// compile without checking references first
    #[arg(long)]
    no_validate: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn resolve(&self) -> Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")
    }

    fn load(&self, path: &Path) -> Result<Program> {
        crate::path_de::load_program(path, self.json_pointer.as_deref())
            .with_context(|| format!("failed to load program ({})", path.display()))
    }

    fn load_checked(&self, path: &Path) -> Result<Program> {
        let program = self.load(path)?;
        crate::validate::validate(&program)
            .with_context(|| format!("invalid program ({})", path.display()))?;
        Ok(program)
    }
}

impl GlslOut {
    fn compile_one(&self, path: &Path) -> Result<String> {
        let program = if self.no_validate {
            self.input_settings.load(path)?
        } else {
            self.input_settings.load_checked(path)?
        };
        Ok(crate::glsl::compile(&program))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Glsl(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                let paths = target.input_settings.resolve()?;
                log::info!("compiling {} program(s)", paths.len());

                // compile is pure, so inputs are independent
                let results = paths
                    .par_iter()
                    .map(|path| target.compile_one(path))
                    .collect::<Vec<_>>();

                let mut failed = 0usize;
                for (path, result) in paths.iter().zip(results) {
                    let glsl_src = match result {
                        Ok(x) => x,
                        Err(error) => {
                            failed += 1;
                            eprintln!("{} {error:#}", "failed:".red().bold());
                            continue;
                        }
                    };
                    match target.out_dir.as_ref() {
                        Some(out_dir) => {
                            let out = output_path(out_dir, path);
                            std::fs::create_dir_all(out_dir)
                                .with_context(|| format!("failed to create {}", out_dir.display()))?;
                            std::fs::write(&out, &glsl_src)
                                .with_context(|| format!("failed to write {}", out.display()))?;
                            eprintln!("{} {} → {}", "compiled".green(), path.display(), out.display());
                        }
                        None => print!("{glsl_src}"),
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} program(s) failed", paths.len());
                }
                Ok(())
            }
            Command::Check(target) => {
                let paths = target.input_settings.resolve()?;
                let results = paths
                    .par_iter()
                    .map(|path| target.input_settings.load_checked(path).map(|_| ()))
                    .collect::<Vec<_>>();

                let mut failed = 0usize;
                for (path, result) in paths.iter().zip(results) {
                    match result {
                        Ok(()) => eprintln!("{} {}", "ok".green(), path.display()),
                        Err(error) => {
                            failed += 1;
                            eprintln!("{} {error:#}", "failed:".red().bold());
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} program(s) failed", paths.len());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn output_path(out_dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    out_dir.join(stem).with_extension("glsl")
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shaderir-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(out, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn globs_expand_and_empty_globs_fail() {
        let dir = scratch_dir("glob");
        std::fs::write(dir.join("one.json"), "{}").unwrap();
        std::fs::write(dir.join("two.json"), "{}").unwrap();
        let pattern = format!("{}/*.json", dir.display());
        let mut out = resolve_file_path_patterns([pattern.as_str()]).unwrap();
        out.sort();
        assert_eq!(out, vec![dir.join("one.json"), dir.join("two.json")]);

        let empty = format!("{}/*.nothing", dir.display());
        assert!(resolve_file_path_patterns([empty.as_str()]).is_err());
    }

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("shaders/blit.json")),
            PathBuf::from("out/blit.glsl"),
        );
    }

    #[test]
    fn parses_glsl_command() {
        let cli = CommandLineInterface::try_parse_from([
            "shaderir", "glsl", "-i", "a.json", "b.json", "--json-pointer", "/program", "--out-dir", "out",
        ]).unwrap();
        let Command::Glsl(target) = cli.cmd else { panic!("expected glsl command") };
        assert_eq!(target.input_settings.input, vec!["a.json", "b.json"]);
        assert_eq!(target.input_settings.json_pointer.as_deref(), Some("/program"));
        assert_eq!(target.out_dir, Some(PathBuf::from("out")));
        assert!(!target.no_validate);
    }

    #[test]
    fn glsl_command_writes_files() {
        let dir = scratch_dir("run");
        let input = dir.join("uniform.json");
        std::fs::write(&input, r#"{"uniforms": ["Float"]}"#).unwrap();
        let out_dir = dir.join("out");
        let cli = CommandLineInterface::try_parse_from([
            "shaderir".to_string(),
            "glsl".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "--out-dir".to_string(),
            out_dir.display().to_string(),
        ]).unwrap();
        cli.run().unwrap();
        let glsl_src = std::fs::read_to_string(out_dir.join("uniform.glsl")).unwrap();
        assert_eq!(glsl_src, "uniform float U0;\n");
    }

    #[test]
    fn check_command_rejects_bad_programs() {
        let dir = scratch_dir("check");
        let input = dir.join("bad.json");
        std::fs::write(&input, r#"{"funcs": [{"index": 0, "block": {"stmts": [{"Expr": {"LocalVariable": 4}}]}}]}"#).unwrap();
        let cli = CommandLineInterface::try_parse_from([
            "shaderir".to_string(),
            "check".to_string(),
            "-i".to_string(),
            input.display().to_string(),
        ]).unwrap();
        assert!(cli.run().is_err());
    }
}
