use crate::context::ContextSpec;
use crate::definition::{DetectorDefinition, Implementation};
use crate::error::{PiiError, Result};

use super::{CallableTask, PatternTask, Task, TaskArgs, TaskKind};

/// Build an executable task from a definition.
pub fn build_task(def: &DetectorDefinition) -> Result<Task> {
    if def.lang.is_empty() {
        return Err(PiiError::InvalidDefinition {
            reason: format!("{}: missing field 'lang'", def.category),
        });
    }
    if def.name.is_empty() {
        return Err(PiiError::InvalidDefinition {
            reason: format!("{}: missing field 'name'", def.category),
        });
    }
    if def.implementation.payload().is_empty() {
        return Err(PiiError::InvalidDefinition {
            reason: format!("{}: missing implementation payload", def.category),
        });
    }

    let args = TaskArgs {
        category: def.category,
        lang: def.lang.clone(),
        country: def.country.clone(),
        name: def.name.clone(),
        doc: def.doc.clone(),
        kwargs: def.kwargs.clone(),
    };
    let context = def.context.as_ref().map(ContextSpec::parse).transpose()?;

    let kind = match &def.implementation {
        Implementation::Pattern(pattern) => TaskKind::Pattern(PatternTask::new(pattern, &def.name)?),
        Implementation::Callable { name, call } => {
            TaskKind::Callable(CallableTask::new(name, call.clone()))
        }
        Implementation::Structured { ctor, .. } => TaskKind::Structured(ctor(&args)?),
    };

    Ok(Task::new(args, context, kind))
}
