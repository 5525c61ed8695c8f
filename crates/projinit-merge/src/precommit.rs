use anyhow::{anyhow, Context, Result};
use projinit_standards::HookRepo;
use serde_yaml::{Mapping, Value};

/// The repo block as it belongs in `.pre-commit-config.yaml`; the catalog-only `id` is dropped.
pub fn hook_block(hook: &HookRepo) -> Result<Value> {
    let mut m = Mapping::new();
    m.insert("repo".into(), Value::String(hook.repo.clone()));
    if let Some(rev) = &hook.rev {
        m.insert("rev".into(), Value::String(rev.clone()));
    }
    m.insert("hooks".into(), serde_yaml::to_value(&hook.hooks).context("serialize hooks")?);
    Ok(Value::Mapping(m))
}

fn hook_id(hook: &Value) -> Option<&Value> {
    hook.get("id")
}

/// Fold repo blocks into a parsed pre-commit document.
///
/// A block whose `repo` URL is already listed contributes only hooks with unseen ids, and
/// bumps `rev` when it carries one. Unknown repos are appended whole.
pub fn merge_precommit_hooks(existing: &Value, hooks: &[HookRepo]) -> Result<Value> {
    let mut doc = match existing {
        Value::Null => Mapping::new(),
        Value::Mapping(m) => m.clone(),
        _ => return Err(anyhow!("pre-commit config is not a mapping")),
    };
    let mut repos = match doc.get("repos") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(s)) => s.clone(),
        Some(_) => return Err(anyhow!("pre-commit config `repos` is not a list")),
    };

    for hook in hooks {
        let pos = repos.iter().position(|r| r.get("repo").and_then(Value::as_str) == Some(hook.repo.as_str()));
        let Some(pos) = pos else {
            tracing::debug!(repo = %hook.repo, "adding pre-commit repo");
            repos.push(hook_block(hook)?);
            continue;
        };
        let Value::Mapping(block) = &mut repos[pos] else {
            continue;
        };

        let mut existing_hooks = match block.get("hooks") {
            Some(Value::Sequence(s)) => s.clone(),
            _ => Vec::new(),
        };
        for h in &hook.hooks {
            let id = Value::String(h.id.clone());
            if !existing_hooks.iter().any(|e| hook_id(e) == Some(&id)) {
                existing_hooks.push(serde_yaml::to_value(h).context("serialize hook")?);
            }
        }
        block.insert("hooks".into(), Value::Sequence(existing_hooks));
        if let Some(rev) = &hook.rev {
            block.insert("rev".into(), Value::String(rev.clone()));
        }
    }

    doc.insert("repos".into(), Value::Sequence(repos));
    Ok(Value::Mapping(doc))
}

/// Text-level wrapper: parse, merge, and re-serialize. Unparseable input is an error, never
/// silently replaced.
pub fn merge_precommit_config(text: &str, hooks: &[HookRepo]) -> Result<String> {
    let existing: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(text).context("parse pre-commit config")?
    };
    let merged = merge_precommit_hooks(&existing, hooks)?;
    serde_yaml::to_string(&merged).context("serialize pre-commit config")
}
