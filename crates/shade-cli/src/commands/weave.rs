//! `shade weave`: weave classes and emit them.

use super::{load_config, load_pool, select_classes, EmitFormat};
use crate::output::StyledOutput;
use anyhow::Context;
use shade_engine::weave_batch;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct WeaveArgs {
    pub pool: PathBuf,
    pub classes: Vec<String>,
    pub emit: EmitFormat,
    pub config: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

pub fn execute(args: WeaveArgs, out: &mut StyledOutput) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let pool = load_pool(&args.pool)?;
    let names = select_classes(&pool, &args.classes);
    if names.is_empty() {
        anyhow::bail!("{} contains no classes to weave", args.pool.display());
    }

    let backend = args.emit.backend(&config);
    let outcomes = weave_batch(&pool, &config, &names);

    let mut failed = 0;
    for outcome in outcomes {
        let (class, report) = match outcome.result {
            Ok(woven) => woven,
            Err(err) => {
                failed += 1;
                out.error(&format!("{}: {}", outcome.class, error_chain(&err)));
                continue;
            }
        };
        let artifact = backend
            .emit_class(&class)
            .with_context(|| format!("failed to emit {}", class.name()))?;

        match &args.out_dir {
            Some(dir) => {
                let path = artifact_path(dir, class.name(), backend.extension());
                write_artifact(&path, &artifact)?;
                out.status("wrote", &path.display().to_string());
            }
            None => {
                out.plain(&artifact);
                out.flush();
            }
        }
        info!(%report, "emitted");
    }

    if failed > 0 {
        anyhow::bail!("{} of {} classes failed to weave", failed, names.len());
    }
    Ok(())
}

/// `<dir>/com/example/Foo.<ext>` for `com.example.Foo`
pub fn artifact_path(dir: &Path, class: &str, extension: &str) -> PathBuf {
    let mut path = dir.to_path_buf();
    path.extend(class.split('.'));
    path.set_extension(extension);
    path
}

fn write_artifact(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_follows_package() {
        let path = artifact_path(Path::new("out"), "com.example.Foo", "java");
        assert_eq!(path, Path::new("out").join("com").join("example").join("Foo.java"));

        let path = artifact_path(Path::new("out"), "Plain", "ir");
        assert_eq!(path, Path::new("out").join("Plain.ir"));
    }
}
