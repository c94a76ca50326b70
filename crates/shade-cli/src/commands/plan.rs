//! `shade plan`: show what weaving would do, member by member.

use super::{load_config, load_pool, select_classes};
use crate::output::StyledOutput;
use shade_engine::Weaver;
use std::path::Path;

const ACTION_WIDTH: usize = 40;

pub fn execute(
    pool_path: &Path,
    classes: &[String],
    config: Option<&Path>,
    out: &mut StyledOutput,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let pool = load_pool(pool_path)?;
    let weaver = Weaver::new(&pool, &config);

    let mut failed = 0;
    for name in select_classes(&pool, classes) {
        let plan = pool.require(&name).and_then(|class| weaver.plan(class));
        let plan = match plan {
            Ok(plan) => plan,
            Err(err) => {
                failed += 1;
                out.error(&format!("{}: {}", name, err));
                continue;
            }
        };

        out.bold(&name);
        out.newline();
        for entry in &plan.entries {
            out.plain("  ");
            out.action(&entry.action, ACTION_WIDTH);
            out.plain(&entry.member);
            out.newline();
        }
        out.dim(&format!("  {}", plan));
        out.newline();
        out.newline();
    }
    out.flush();

    if failed > 0 {
        anyhow::bail!("{} classes cannot be woven", failed);
    }
    Ok(())
}
